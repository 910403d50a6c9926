//! Session template authoring.
//!
//! Templates are validated here, before they reach storage or the
//! engine: the engine itself trusts whatever it is given.

use std::str::FromStr;

use thiserror::Error;

use crate::types::{Interval, IntervalKind, SessionTemplate};

/// Maximum length of a single interval (24 hours).
pub const MAX_INTERVAL_SECONDS: u32 = 24 * 60 * 60;

// ============================================================================
// TemplateError
// ============================================================================

/// Errors produced while authoring a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template name must not be empty")]
    EmptyName,

    #[error("template needs at least one interval")]
    NoIntervals,

    #[error("interval {0} has an empty name")]
    EmptyIntervalName(usize),

    #[error("interval '{0}' must last at least one second")]
    ZeroDuration(String),

    #[error("interval '{name}' is too long ({seconds}s, max {MAX_INTERVAL_SECONDS}s)")]
    TooLong { name: String, seconds: u32 },

    #[error("invalid duration '{0}' (try 90s, 25m, 1h30m)")]
    InvalidDuration(String),

    #[error("invalid interval '{0}' (expected NAME:DURATION[:work|break])")]
    InvalidSpec(String),
}

// ============================================================================
// Duration parsing
// ============================================================================

/// Parses a human duration into seconds.
///
/// Accepts plain seconds (`90`) or unit groups in any combination of
/// `h`, `m` and `s` with optional spaces (`25m`, `1h30m`, `1h 5m 10s`).
pub fn parse_duration(input: &str) -> Result<u32, TemplateError> {
    let invalid = || TemplateError::InvalidDuration(input.to_string());
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<u32>().map_err(|_| invalid());
    }

    let mut total: u32 = 0;
    let mut digits = String::new();
    for c in trimmed.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' => {}
            'h' | 'H' | 'm' | 'M' | 's' | 'S' => {
                if digits.is_empty() {
                    return Err(invalid());
                }
                let value: u32 = digits.parse().map_err(|_| invalid())?;
                digits.clear();
                let factor = match c.to_ascii_lowercase() {
                    'h' => 3600,
                    'm' => 60,
                    _ => 1,
                };
                total = value
                    .checked_mul(factor)
                    .and_then(|v| total.checked_add(v))
                    .ok_or_else(invalid)?;
            }
            _ => return Err(invalid()),
        }
    }

    if !digits.is_empty() {
        return Err(invalid());
    }
    Ok(total)
}

// ============================================================================
// IntervalSpec
// ============================================================================

/// Command-line description of one interval: `NAME:DURATION[:KIND]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSpec {
    pub name: String,
    pub duration: u32,
    pub kind: IntervalKind,
}

impl FromStr for IntervalSpec {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemplateError::InvalidSpec(s.to_string());
        let parts: Vec<&str> = s.split(':').collect();

        let (name, duration, kind) = match parts.as_slice() {
            [name, duration] => (*name, *duration, IntervalKind::Work),
            [name, duration, kind] => (
                *name,
                *duration,
                kind.parse::<IntervalKind>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };

        Ok(Self {
            name: name.trim().to_string(),
            duration: parse_duration(duration)?,
            kind,
        })
    }
}

// ============================================================================
// TemplateBuilder
// ============================================================================

/// Collects intervals and validates them into a [`SessionTemplate`].
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    name: String,
    intervals: Vec<IntervalSpec>,
}

impl TemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
        }
    }

    /// Appends an interval.
    #[must_use]
    pub fn interval(mut self, name: impl Into<String>, duration: u32, kind: IntervalKind) -> Self {
        self.intervals.push(IntervalSpec {
            name: name.into(),
            duration,
            kind,
        });
        self
    }

    /// Appends a parsed interval.
    #[must_use]
    pub fn spec(mut self, spec: IntervalSpec) -> Self {
        self.intervals.push(spec);
        self
    }

    /// Validates and builds the template.
    ///
    /// Names are trimmed. Every interval needs a name and a positive
    /// duration; the template needs a name and at least one interval.
    pub fn build(self, created_at: i64) -> Result<SessionTemplate, TemplateError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if self.intervals.is_empty() {
            return Err(TemplateError::NoIntervals);
        }

        let intervals = self
            .intervals
            .into_iter()
            .enumerate()
            .map(|(position, spec)| {
                let interval_name = spec.name.trim().to_string();
                if interval_name.is_empty() {
                    return Err(TemplateError::EmptyIntervalName(position + 1));
                }
                if spec.duration == 0 {
                    return Err(TemplateError::ZeroDuration(interval_name));
                }
                if spec.duration > MAX_INTERVAL_SECONDS {
                    return Err(TemplateError::TooLong {
                        name: interval_name,
                        seconds: spec.duration,
                    });
                }
                Ok(Interval::new(interval_name, spec.duration, spec.kind))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SessionTemplate {
            id: crate::types::generate_id(),
            name,
            intervals,
            created_at,
        })
    }

    /// Builds the template stamped with the current time.
    pub fn build_now(self) -> Result<SessionTemplate, TemplateError> {
        self.build(chrono::Utc::now().timestamp_millis())
    }
}

// ============================================================================
// Tests
// ============================================================================
