//! Sidekick TUI - Terminal surface for the sidekick core
//!
//! A full-screen terminal stage for the animated companion. The surface owns
//! the refresh loop and the current Action; the core does the rest.
//!
//! # Architecture
//!
//! - **App**: Event loop, key-to-Action mapping, per-frame core tick
//! - **Canvas**: RGBA framebuffer implementing the core `Surface` trait, plus
//!   a half-block rasterizer widget
//! - **Character**: Paints a frame snapshot as filled primitives
//! - **Widgets**: Reaction bar legend

pub mod app;
pub mod canvas;
pub mod character;
pub mod theme;
pub mod widgets;

pub use app::App;
