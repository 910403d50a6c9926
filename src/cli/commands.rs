//! Command definitions for the focusplan CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::template::IntervalSpec;
use crate::types::DAYS_OF_WEEK;

// ============================================================================
// CLI Structure
// ============================================================================

/// focusplan - interval timer and weekly planner
#[derive(Parser, Debug)]
#[command(
    name = "focusplan",
    version,
    about = "Interval timer sessions and a weekly activity planner",
    long_about = "Run work/break interval sessions from saved templates and plan \
                  your week in hour blocks. All data is stored as JSON in the data directory.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding templates, planner and config
    #[arg(long, global = true, env = "FOCUSPLAN_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a timer session from a saved template
    Run(RunArgs),

    /// Manage session templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Show and edit the weekly planner
    #[command(subcommand)]
    Planner(PlannerCommand),

    /// Manage planner categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Export templates and planner to a backup file
    Export {
        /// Output file (defaults to productivity-backup-<date>.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Replace templates and planner with a backup file
    Import {
        /// Backup file to import
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Template id or name
    pub template: String,

    /// Disable cue sounds
    #[arg(long)]
    pub no_sound: bool,

    /// Start playing immediately
    #[arg(short, long)]
    pub autostart: bool,

    /// Leave once the session completes
    #[arg(long)]
    pub exit_on_complete: bool,

    /// Tick period in milliseconds (10-1000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: Option<u64>,
}

// ============================================================================
// Template Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum TemplateCommand {
    /// List saved templates
    List,

    /// Show the intervals of a template
    Show {
        /// Template id or name
        template: String,
    },

    /// Create a template
    Create {
        /// Template name
        #[arg(value_parser = validate_name)]
        name: String,

        /// Interval as NAME:DURATION[:work|break], repeatable (e.g. Focus:25m)
        #[arg(
            short,
            long = "interval",
            value_name = "NAME:DURATION[:KIND]",
            required = true,
            value_parser = parse_interval_spec
        )]
        intervals: Vec<IntervalSpec>,
    },

    /// Delete a template
    Delete {
        /// Template id or name
        template: String,
    },
}

// ============================================================================
// Planner Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum PlannerCommand {
    /// Show the week, or a single day
    Show {
        /// Only show this day (0-6 or a day name)
        #[arg(short, long, value_parser = parse_day)]
        day: Option<u8>,
    },

    /// Add an activity
    Add(ActivityArgs),

    /// Change fields of an activity
    Edit {
        /// Activity id (a unique prefix is enough)
        id: String,

        #[arg(short, long, value_parser = validate_name)]
        title: Option<String>,

        /// Category id or name
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, value_parser = parse_day)]
        day: Option<u8>,

        #[arg(long = "hour", value_parser = clap::value_parser!(u8).range(0..=23))]
        start_hour: Option<u8>,

        /// Length in hours (1-8)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
        duration: Option<u8>,
    },

    /// Move an activity to another day and hour
    Move {
        /// Activity id (a unique prefix is enough)
        id: String,

        #[arg(short, long, value_parser = parse_day)]
        day: u8,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=23))]
        hour: u8,
    },

    /// Remove an activity
    Remove {
        /// Activity id (a unique prefix is enough)
        id: String,
    },
}

/// Arguments for adding an activity
#[derive(Args, Debug, Clone)]
pub struct ActivityArgs {
    /// Activity title
    #[arg(value_parser = validate_name)]
    pub title: String,

    /// Category id or name
    #[arg(short, long, default_value = "work")]
    pub category: String,

    /// Day of week (0-6 or a day name)
    #[arg(short, long, value_parser = parse_day)]
    pub day: u8,

    /// Start hour (0-23)
    #[arg(long = "hour", value_parser = clap::value_parser!(u8).range(0..=23))]
    pub start_hour: u8,

    /// Length in hours (1-8)
    #[arg(
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub duration: u8,
}

// ============================================================================
// Category Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum CategoryCommand {
    /// List categories
    List,

    /// Add a category
    Add {
        #[arg(value_parser = validate_name)]
        name: String,

        /// Hex color such as #3B82F6
        #[arg(long)]
        color: String,
    },

    /// Rename or recolor a category
    Edit {
        /// Category id or name
        category: String,

        #[arg(long, value_parser = validate_name)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a category and all of its activities
    Remove {
        /// Category id or name
        category: String,
    },
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a display name.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_name(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("name must be at most 100 characters".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_interval_spec(s: &str) -> Result<IntervalSpec, String> {
    s.parse().map_err(|e: crate::template::TemplateError| e.to_string())
}

/// Parses a day as `0`-`6` (0 = Sunday) or an unambiguous day name prefix
/// of at least two letters.
pub fn parse_day(s: &str) -> Result<u8, String> {
    let input = s.trim().to_lowercase();
    if let Ok(index) = input.parse::<u8>() {
        if index <= 6 {
            return Ok(index);
        }
        return Err(format!("day must be 0-6, got {index}"));
    }

    if input.len() >= 2 {
        let matches: Vec<usize> = DAYS_OF_WEEK
            .iter()
            .enumerate()
            .filter(|(_, name)| name.to_lowercase().starts_with(&input))
            .map(|(i, _)| i)
            .collect();
        if let [index] = matches.as_slice() {
            return Ok(*index as u8);
        }
    }
    Err(format!("unknown day '{s}' (use 0-6 or a day name)"))
}

// ============================================================================
// Tests
// ============================================================================
