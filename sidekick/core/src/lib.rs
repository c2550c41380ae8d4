//! Sidekick Core - Headless Animation and Particle Engine
//!
//! This crate drives the animated companion that reacts to a communication
//! board: body, eyes and shadow motion, face details, idle fidgets, blinks
//! and particle effects. It is completely independent of any UI framework;
//! a surface owns the refresh loop, hands over the current action once per
//! frame and draws what comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Surface (TUI, ...)                       │
//! │   refresh loop · key → Action · appearance · volume          │
//! └───────────────┬───────────────────────────────▲──────────────┘
//!                 │ FrameInput                    │ FrameSnapshot
//! ┌───────────────┼───────────────────────────────┼──────────────┐
//! │               ▼          SIDEKICK CORE        │              │
//! │  ┌──────────────────────┐   effective keys  ┌─┴───────────┐  │
//! │  │ ExpressionController ├──────────────────►│ LayerAnimator│ │
//! │  │ transition · fidget  │                   │ body · eyes  │ │
//! │  │ blink · auto-reset   │                   │ shadow       │ │
//! │  └──────────────────────┘                   └──────┬──────┘  │
//! │                                       motion tables│         │
//! │  ┌──────────────────────┐                          ▼         │
//! │  │    ParticleEngine    ├──► Surface (clear + fill per tick) │
//! │  └──────────────────────┘                                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Sidekick`]: everything assembled behind one per-frame `tick`
//! - [`Action`]: the closed trigger vocabulary
//! - [`ExpressionController`]: timers and effective-key derivation
//! - [`LayerAnimator`]: samples motion descriptors into a [`Pose`]
//! - [`ParticleEngine`]: bounded particle pool and its draw pass
//! - [`RandomSource`]: injectable randomness for deterministic tests
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use sidekick_core::{Action, FrameInput, RecordingSurface, SeededRandom, Sidekick};
//!
//! let mut sidekick = Sidekick::new(
//!     Action::Idle,
//!     RecordingSurface::default(),
//!     Box::new(SeededRandom::new(1)),
//! );
//!
//! let frame = sidekick
//!     .tick(&FrameInput::new(Action::Happy, Duration::from_millis(16)))
//!     .unwrap();
//! assert!(frame.state.is_transitioning);
//! ```
//!
//! # Module Overview
//!
//! - [`action`]: Action vocabulary
//! - [`animation`]: Timing, easing, motion tables and the layer animator
//! - [`appearance`]: Colors, presets and the appearance snapshot
//! - [`audio`]: Microphone volume normalization
//! - [`config`]: TOML/env/CLI configuration loading
//! - [`expression`]: The expression controller, eye rules and face features
//! - [`particles`]: Particle physics, spawn rules and drawing
//! - [`random`]: Randomness sources
//! - [`sidekick`]: The assembled per-frame driver
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod action;
pub mod animation;
pub mod appearance;
pub mod audio;
pub mod config;
pub mod expression;
pub mod particles;
pub mod random;
pub mod sidekick;

// Re-exports for convenience
pub use action::{Action, ActionGroup, UnknownActionError};
pub use appearance::{AppearanceConfig, Color, ColorParseError, ColorPreset};
pub use sidekick::{ActionCompleteHandler, EyeFrame, FrameInput, FrameSnapshot, Sidekick};

// Animation exports
pub use animation::{
    Channel, Easing, Layer, LayerAnimator, MotionDescriptor, Pose, Repeat, Timing, Track,
    VariantKey,
};

// Expression exports
pub use expression::{
    EyeContext, EyeSide, EyeTarget, ExpressionController, ExpressionEvent, FaceFeatures, Fidget,
    Mouth, TransitionState,
};

// Particle exports
pub use particles::{
    Paint, Particle, ParticleEngine, ParticleKind, RecordingSurface, Shape, SpawnRule, Surface,
};

// Audio exports
pub use audio::{audio_scale, VolumeMeter};

// Randomness exports
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, SidekickConfig, SidekickToml,
};
