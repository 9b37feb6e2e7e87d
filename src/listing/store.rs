//! Form data store abstraction.
//!
//! Step pages read and patch the active listing through this trait rather
//! than through shared global state, so tests can swap in their own store.

use uuid::Uuid;

use super::form::{ListingForm, ListingPatch};
use crate::wizard::Classification;

/// Holds the fields of the listing being edited
pub trait FormDataStore: Send + Sync {
    /// Copy of the current record
    fn snapshot(&self) -> ListingForm;

    fn listing_id(&self) -> Uuid;

    fn classification(&self) -> Classification;

    fn form_position(&self) -> usize;

    /// Apply a partial update; marks the store dirty if anything was set
    fn patch(&mut self, patch: ListingPatch);

    /// Whether there are changes not yet handed to persistence
    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);
}

/// In-process store backed by a single `ListingForm`
#[derive(Debug, Clone)]
pub struct InMemoryFormStore {
    form: ListingForm,
    dirty: bool,
}

impl InMemoryFormStore {
    /// Wrap an existing record (e.g. one loaded from disk); starts clean
    pub fn new(form: ListingForm) -> Self {
        Self { form, dirty: false }
    }

    /// A new listing that has not been persisted yet; starts dirty
    pub fn fresh(classification: Classification) -> Self {
        Self {
            form: ListingForm::new(classification),
            dirty: true,
        }
    }

    pub fn form(&self) -> &ListingForm {
        &self.form
    }
}

impl FormDataStore for InMemoryFormStore {
    fn snapshot(&self) -> ListingForm {
        self.form.clone()
    }

    fn listing_id(&self) -> Uuid {
        self.form.id
    }

    fn classification(&self) -> Classification {
        self.form.classification.clone()
    }

    fn form_position(&self) -> usize {
        self.form.form_position
    }

    fn patch(&mut self, patch: ListingPatch) {
        if self.form.apply(patch) {
            self.dirty = true;
        }
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
