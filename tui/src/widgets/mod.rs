//! Widgets drawn around the sidekick stage

pub mod reaction_bar;

pub use reaction_bar::{command_for, Command, ReactionBar};
