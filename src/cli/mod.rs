//! CLI module for focusplan.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: The interactive foreground timer session

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{
    ActivityArgs, CategoryCommand, Cli, Commands, PlannerCommand, RunArgs, TemplateCommand,
};
pub use display::Display;
pub use session::{run_interactive, SessionOptions};
