//! Saved session templates.

use tracing::info;

use crate::types::SessionTemplate;

use super::{JsonStore, StoreError};

/// Storage key of the template list.
pub const TEMPLATES_KEY: &str = "timer-templates";

/// Looks a template up by id, then exact name, then case-insensitive name.
pub fn find_template<'a>(templates: &'a [SessionTemplate], query: &str) -> Option<&'a SessionTemplate> {
    let query = query.trim();
    templates
        .iter()
        .find(|t| t.id == query)
        .or_else(|| templates.iter().find(|t| t.name == query))
        .or_else(|| {
            let lowered = query.to_lowercase();
            templates.iter().find(|t| t.name.to_lowercase() == lowered)
        })
}

/// In-memory template list that writes through to a [`JsonStore`].
///
/// Templates keep their insertion order. Every mutation is saved before
/// the call returns.
#[derive(Debug)]
pub struct TemplateStore {
    store: JsonStore,
    templates: Vec<SessionTemplate>,
}

impl TemplateStore {
    /// Loads the stored templates. A missing document is an empty list.
    pub fn open(store: JsonStore) -> Result<Self, StoreError> {
        let templates: Vec<SessionTemplate> = store.get(TEMPLATES_KEY)?.unwrap_or_default();
        Ok(Self { store, templates })
    }

    pub fn list(&self) -> &[SessionTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SessionTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// See [`find_template`].
    pub fn find(&self, query: &str) -> Option<&SessionTemplate> {
        find_template(&self.templates, query)
    }

    /// Appends a template, replacing any existing one with the same id.
    pub fn add(&mut self, template: SessionTemplate) -> Result<(), StoreError> {
        info!("Saving template '{}' ({})", template.name, template.id);
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
        self.save()
    }

    /// Deletes a template by id, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Result<Option<SessionTemplate>, StoreError> {
        let Some(position) = self.templates.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = self.templates.remove(position);
        self.save()?;
        info!("Deleted template '{}'", removed.name);
        Ok(Some(removed))
    }

    /// Replaces the whole list, as done by a backup import.
    pub fn replace_all(&mut self, templates: Vec<SessionTemplate>) -> Result<(), StoreError> {
        self.store.set(TEMPLATES_KEY, &templates)?;
        self.templates = templates;
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        self.store.set(TEMPLATES_KEY, &self.templates)
    }
}
