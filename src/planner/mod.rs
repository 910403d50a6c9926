//! Weekly activity planner.
//!
//! Activities are whole-hour blocks on a seven-day grid, each tagged with
//! a category. All edits are validated before they touch the state and
//! the state is saved after every successful edit.

use thiserror::Error;
use tracing::info;

use crate::store::{JsonStore, StoreError};
use crate::types::{generate_id, Activity, Category, PlannerState};

/// Storage key of the planner document.
pub const PLANNER_KEY: &str = "planner-state";

/// Longest activity, in hours.
pub const MAX_ACTIVITY_HOURS: u8 = 8;

// ============================================================================
// PlannerError
// ============================================================================

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlannerError {
    fn activity_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "activity",
            id: id.to_string(),
        }
    }

    fn category_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "category",
            id: id.to_string(),
        }
    }
}

// ============================================================================
// Edit records
// ============================================================================

/// A new activity before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub title: String,
    pub category_id: String,
    pub day_index: u8,
    pub start_hour: u8,
    pub duration: u8,
}

/// Partial update of an activity. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub day_index: Option<u8>,
    pub start_hour: Option<u8>,
    pub duration: Option<u8>,
}

/// Grid cell an activity is dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub day_index: u8,
    pub hour: u8,
}

/// Partial update of a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

// ============================================================================
// Validation
// ============================================================================

fn validate_day(day_index: u8) -> Result<(), PlannerError> {
    if day_index > 6 {
        return Err(PlannerError::Validation(format!(
            "day must be 0-6 (Sunday-Saturday), got {day_index}"
        )));
    }
    Ok(())
}

fn validate_hour(hour: u8) -> Result<(), PlannerError> {
    if hour > 23 {
        return Err(PlannerError::Validation(format!(
            "start hour must be 0-23, got {hour}"
        )));
    }
    Ok(())
}

fn validate_duration(duration: u8) -> Result<(), PlannerError> {
    if !(1..=MAX_ACTIVITY_HOURS).contains(&duration) {
        return Err(PlannerError::Validation(format!(
            "duration must be 1-{MAX_ACTIVITY_HOURS} hours, got {duration}"
        )));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> Result<String, PlannerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Accepts `#RGB` or `#RRGGBB`.
fn validate_color(color: &str) -> Result<String, PlannerError> {
    let color = color.trim();
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(PlannerError::Validation(format!(
            "color must look like #RRGGBB, got '{color}'"
        )));
    }
    Ok(color.to_uppercase())
}

// ============================================================================
// Planner
// ============================================================================

/// The planner state plus its storage.
#[derive(Debug)]
pub struct Planner {
    store: JsonStore,
    state: PlannerState,
}

impl Planner {
    /// Loads the stored planner, or the default categories if nothing is
    /// stored yet.
    pub fn open(store: JsonStore) -> Result<Self, StoreError> {
        let state = store.get(PLANNER_KEY)?.unwrap_or_default();
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn activities(&self) -> &[Activity] {
        &self.state.activities
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.state.activities.iter().find(|a| a.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.state.categories.iter().find(|c| c.id == id)
    }

    /// Looks a category up by id, then case-insensitive name.
    pub fn find_category(&self, query: &str) -> Option<&Category> {
        let query = query.trim();
        self.category(query).or_else(|| {
            let lowered = query.to_lowercase();
            self.state
                .categories
                .iter()
                .find(|c| c.name.to_lowercase() == lowered)
        })
    }

    /// Activities on `day_index`, ordered by start hour.
    pub fn activities_for_day(&self, day_index: u8) -> Vec<&Activity> {
        let mut day: Vec<&Activity> = self
            .state
            .activities
            .iter()
            .filter(|a| a.day_index == day_index)
            .collect();
        day.sort_by_key(|a| a.start_hour);
        day
    }

    /// Activities occupying the given cell, including ones that started
    /// earlier and run through it.
    pub fn activities_for_slot(&self, day_index: u8, hour: u8) -> Vec<&Activity> {
        self.state
            .activities
            .iter()
            .filter(|a| a.day_index == day_index && a.covers_hour(hour))
            .collect()
    }

    /// Total planned hours per category id, in category order.
    pub fn hours_by_category(&self) -> Vec<(&Category, u32)> {
        self.state
            .categories
            .iter()
            .map(|c| {
                let hours = self
                    .state
                    .activities
                    .iter()
                    .filter(|a| a.category_id == c.id)
                    .map(|a| u32::from(a.duration))
                    .sum();
                (c, hours)
            })
            .collect()
    }

    fn require_category(&self, id: &str) -> Result<(), PlannerError> {
        if self.category(id).is_none() {
            return Err(PlannerError::category_not_found(id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Activities
    // ------------------------------------------------------------------------

    pub fn add_activity(&mut self, draft: ActivityDraft) -> Result<&Activity, PlannerError> {
        let title = validate_text("title", &draft.title)?;
        self.require_category(&draft.category_id)?;
        validate_day(draft.day_index)?;
        validate_hour(draft.start_hour)?;
        validate_duration(draft.duration)?;

        let activity = Activity {
            id: generate_id(),
            title,
            category_id: draft.category_id,
            day_index: draft.day_index,
            start_hour: draft.start_hour,
            duration: draft.duration,
        };
        info!("Adding activity '{}' ({})", activity.title, activity.id);
        self.state.activities.push(activity);
        self.save()?;

        let last = self.state.activities.len() - 1;
        Ok(&self.state.activities[last])
    }

    pub fn update_activity(
        &mut self,
        id: &str,
        update: ActivityUpdate,
    ) -> Result<&Activity, PlannerError> {
        let position = self
            .state
            .activities
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| PlannerError::activity_not_found(id))?;

        let mut updated = self.state.activities[position].clone();
        if let Some(title) = update.title {
            updated.title = validate_text("title", &title)?;
        }
        if let Some(category_id) = update.category_id {
            self.require_category(&category_id)?;
            updated.category_id = category_id;
        }
        if let Some(day_index) = update.day_index {
            validate_day(day_index)?;
            updated.day_index = day_index;
        }
        if let Some(start_hour) = update.start_hour {
            validate_hour(start_hour)?;
            updated.start_hour = start_hour;
        }
        if let Some(duration) = update.duration {
            validate_duration(duration)?;
            updated.duration = duration;
        }

        self.state.activities[position] = updated;
        self.save()?;
        Ok(&self.state.activities[position])
    }

    /// Moves an activity to a new cell, keeping its duration.
    pub fn move_activity(&mut self, id: &str, target: DropTarget) -> Result<&Activity, PlannerError> {
        self.update_activity(
            id,
            ActivityUpdate {
                day_index: Some(target.day_index),
                start_hour: Some(target.hour),
                ..ActivityUpdate::default()
            },
        )
    }

    pub fn remove_activity(&mut self, id: &str) -> Result<Activity, PlannerError> {
        let position = self
            .state
            .activities
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| PlannerError::activity_not_found(id))?;
        let removed = self.state.activities.remove(position);
        self.save()?;
        info!("Removed activity '{}'", removed.title);
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    pub fn add_category(&mut self, name: &str, color: &str) -> Result<&Category, PlannerError> {
        let category = Category {
            id: generate_id(),
            name: validate_text("category name", name)?,
            color: validate_color(color)?,
        };
        info!("Adding category '{}' ({})", category.name, category.id);
        self.state.categories.push(category);
        self.save()?;

        let last = self.state.categories.len() - 1;
        Ok(&self.state.categories[last])
    }

    pub fn update_category(
        &mut self,
        id: &str,
        update: CategoryUpdate,
    ) -> Result<&Category, PlannerError> {
        let position = self
            .state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| PlannerError::category_not_found(id))?;

        let mut updated = self.state.categories[position].clone();
        if let Some(name) = update.name {
            updated.name = validate_text("category name", &name)?;
        }
        if let Some(color) = update.color {
            updated.color = validate_color(&color)?;
        }

        self.state.categories[position] = updated;
        self.save()?;
        Ok(&self.state.categories[position])
    }

    /// Removes a category together with every activity using it.
    ///
    /// Returns the removed category and how many activities went with it.
    pub fn remove_category(&mut self, id: &str) -> Result<(Category, usize), PlannerError> {
        let position = self
            .state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| PlannerError::category_not_found(id))?;
        let removed = self.state.categories.remove(position);

        let before = self.state.activities.len();
        self.state.activities.retain(|a| a.category_id != removed.id);
        let dropped = before - self.state.activities.len();

        self.save()?;
        info!(
            "Removed category '{}' and {} activities",
            removed.name, dropped
        );
        Ok((removed, dropped))
    }

    /// Replaces the whole planner, as done by a backup import.
    pub fn replace_state(&mut self, state: PlannerState) -> Result<(), StoreError> {
        self.store.set(PLANNER_KEY, &state)?;
        self.state = state;
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        self.store.set(PLANNER_KEY, &self.state)
    }
}

// ============================================================================
// Tests
// ============================================================================
