//! Display utilities for the focusplan CLI.
//!
//! This module provides formatted output for:
//! - The live session status line and engine events
//! - Template listings
//! - The weekly planner
//! - Success and error messages
//!
//! Every `show_*` function prints the text built by its `format_*` twin.

use std::fmt::Write as _;
use std::path::Path;

use crate::planner::Planner;
use crate::timer::{format_clock, format_duration, TimerEvent, TimerSnapshot};
use crate::types::{
    format_hour, Activity, AppData, Category, IntervalKind, SessionTemplate, TimerStatus,
    DAYS_OF_WEEK,
};

/// Characters of an id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn kind_label(kind: IntervalKind) -> &'static str {
    kind.as_str()
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// One-line summary of a running session.
    pub fn format_status_line(snapshot: &TimerSnapshot) -> String {
        let Some(template) = &snapshot.template_name else {
            return "-- no template loaded".to_string();
        };

        let marker = match snapshot.status {
            TimerStatus::Running => ">",
            TimerStatus::Ready => "||",
            TimerStatus::Idle => "--",
        };
        let interval = snapshot.interval_name.as_deref().unwrap_or("?");
        let kind = snapshot.interval_kind.map_or("?", kind_label);

        format!(
            "{marker} {template} [{}/{}] {interval} ({kind}) {}  interval {:.0}%  session {:.0}%",
            snapshot.current_index + 1,
            snapshot.interval_count,
            snapshot.formatted_remaining,
            snapshot.interval_progress,
            snapshot.session_progress,
        )
    }

    /// Message for an engine event, given the snapshot taken right after it.
    pub fn format_event(event: &TimerEvent, snapshot: &TimerSnapshot) -> String {
        match event {
            TimerEvent::IntervalAdvanced { index } => match &snapshot.interval_name {
                Some(name) if snapshot.current_index == *index => format!(
                    "* Next: {} ({}, {})",
                    name,
                    snapshot.interval_kind.map_or("?", kind_label),
                    snapshot.formatted_remaining
                ),
                _ => format!("* Next interval #{}", index + 1),
            },
            TimerEvent::SessionComplete => {
                "* Session complete! Press p to start again.".to_string()
            }
        }
    }

    pub fn format_session_help() -> String {
        [
            "Commands:",
            "  p, <enter>   play / pause",
            "  r            reset to the first interval",
            "  s            skip to the next interval",
            "  l <name>     load another template",
            "  h            show this help",
            "  q            quit",
        ]
        .join("\n")
    }

    pub fn show_session_help() {
        println!("{}", Self::format_session_help());
    }

    // ------------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------------

    pub fn format_template_list(templates: &[SessionTemplate]) -> String {
        if templates.is_empty() {
            return "No templates yet. Create one with `focusplan template create`.".to_string();
        }

        let mut out = String::new();
        for template in templates {
            let _ = writeln!(
                out,
                "{}  {:<24} {:>2} intervals  {}",
                short_id(&template.id),
                template.name,
                template.len(),
                format_duration(template.total_seconds())
            );
        }
        out.trim_end().to_string()
    }

    pub fn show_template_list(templates: &[SessionTemplate]) {
        println!("{}", Self::format_template_list(templates));
    }

    pub fn format_template(template: &SessionTemplate) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", template.name, template.id);
        let _ = writeln!(out, "─────────────────────────────");
        for (position, interval) in template.intervals.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {:<20} {:<5} {}",
                position + 1,
                interval.name,
                kind_label(interval.kind),
                format_clock(interval.duration)
            );
        }
        let _ = write!(out, "Total: {}", format_duration(template.total_seconds()));
        out
    }

    pub fn show_template(template: &SessionTemplate) {
        println!("{}", Self::format_template(template));
    }

    pub fn show_template_created(template: &SessionTemplate) {
        println!(
            "* Created template '{}' ({})",
            template.name,
            short_id(&template.id)
        );
    }

    pub fn show_template_deleted(template: &SessionTemplate) {
        println!("* Deleted template '{}'", template.name);
    }

    // ------------------------------------------------------------------------
    // Planner
    // ------------------------------------------------------------------------

    fn format_activity(activity: &Activity, category: Option<&Category>) -> String {
        let end = (u16::from(activity.start_hour) + u16::from(activity.duration)) % 24;
        format!(
            "  {:>4}-{:<4}  {:<24} [{}]  {}",
            format_hour(activity.start_hour),
            format_hour(end as u8),
            activity.title,
            category.map_or("uncategorized", |c| c.name.as_str()),
            short_id(&activity.id)
        )
    }

    pub fn format_day(planner: &Planner, day_index: u8) -> String {
        let name = DAYS_OF_WEEK
            .get(usize::from(day_index))
            .copied()
            .unwrap_or("?");
        let mut out = String::from(name);
        let activities = planner.activities_for_day(day_index);
        if activities.is_empty() {
            out.push_str("\n  (nothing planned)");
        }
        for activity in activities {
            out.push('\n');
            out.push_str(&Self::format_activity(
                activity,
                planner.category(&activity.category_id),
            ));
        }
        out
    }

    pub fn format_week(planner: &Planner) -> String {
        let mut sections: Vec<String> = (0..7u8).map(|day| Self::format_day(planner, day)).collect();

        let totals: Vec<String> = planner
            .hours_by_category()
            .into_iter()
            .filter(|(_, hours)| *hours > 0)
            .map(|(category, hours)| format!("{} {}h", category.name, hours))
            .collect();
        if !totals.is_empty() {
            sections.push(format!("Planned: {}", totals.join(", ")));
        }
        sections.join("\n\n")
    }

    pub fn show_week(planner: &Planner) {
        println!("{}", Self::format_week(planner));
    }

    pub fn show_day(planner: &Planner, day_index: u8) {
        println!("{}", Self::format_day(planner, day_index));
    }

    pub fn show_activity_saved(verb: &str, activity: &Activity) {
        let day = DAYS_OF_WEEK
            .get(usize::from(activity.day_index))
            .copied()
            .unwrap_or("?");
        println!(
            "* {verb} '{}' on {day} at {} for {}h ({})",
            activity.title,
            format_hour(activity.start_hour),
            activity.duration,
            short_id(&activity.id)
        );
    }

    pub fn show_activity_removed(activity: &Activity) {
        println!("* Removed '{}'", activity.title);
    }

    pub fn format_categories(categories: &[Category]) -> String {
        if categories.is_empty() {
            return "No categories.".to_string();
        }
        categories
            .iter()
            .map(|c| format!("{:<10} {:<16} {}", short_id(&c.id), c.name, c.color))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn show_categories(categories: &[Category]) {
        println!("{}", Self::format_categories(categories));
    }

    pub fn show_category_saved(verb: &str, category: &Category) {
        println!("* {verb} category '{}' ({})", category.name, category.color);
    }

    pub fn show_category_removed(category: &Category, activities: usize) {
        println!(
            "* Removed category '{}' and {} activities",
            category.name, activities
        );
    }

    // ------------------------------------------------------------------------
    // Backup
    // ------------------------------------------------------------------------

    pub fn format_backup_summary(data: &AppData) -> String {
        format!(
            "{} templates, {} activities, {} categories",
            data.templates.len(),
            data.planner.activities.len(),
            data.planner.categories.len()
        )
    }

    pub fn show_export_success(path: &Path, data: &AppData) {
        println!("* Exported to {}", path.display());
        println!("  {}", Self::format_backup_summary(data));
    }

    pub fn show_import_success(data: &AppData) {
        println!("* Imported backup v{}", data.version);
        println!("  {}", Self::format_backup_summary(data));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
