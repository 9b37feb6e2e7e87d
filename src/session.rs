//! Wizard session: one listing being edited step by step.
//!
//! Ties a [`StepSequencer`] to the listing's [`FormDataStore`] and hands
//! committed steps to the write-behind worker without waiting for the write.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::listing::{FormDataStore, ListingForm, ListingPatch};
use crate::persistence::{PersistEvent, WriteBehind};
use crate::wizard::{Step, StepCatalog, StepSequencer};

pub struct WizardSession {
    sequencer: StepSequencer,
    store: Box<dyn FormDataStore>,
    writer: Option<WriteBehind>,
}

impl WizardSession {
    /// Open a session, seeding the current step from the stored form position
    pub fn open(
        catalog: Arc<StepCatalog>,
        store: Box<dyn FormDataStore>,
        writer: Option<WriteBehind>,
    ) -> Self {
        let sequencer = StepSequencer::new(catalog, store.classification(), store.form_position());
        info!(
            listing = %store.listing_id(),
            classification = %store.classification(),
            form_position = store.form_position(),
            current = sequencer.current_index(),
            "wizard session opened"
        );
        Self {
            sequencer,
            store,
            writer,
        }
    }

    pub fn listing_id(&self) -> Uuid {
        self.store.listing_id()
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn store(&self) -> &dyn FormDataStore {
        self.store.as_ref()
    }

    pub fn snapshot(&self) -> ListingForm {
        self.store.snapshot()
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.sequencer.current_step()
    }

    pub fn progress(&self) -> f64 {
        self.sequencer.progress_fraction()
    }

    pub fn form_position(&self) -> usize {
        self.store.form_position()
    }

    fn sync_classification(&mut self) {
        self.sequencer
            .set_classification(self.store.classification());
    }

    /// Apply a partial update from a step page
    pub fn patch(&mut self, patch: ListingPatch) {
        self.store.patch(patch);
        self.sync_classification();
    }

    /// Move to the next visible step and queue the snapshot for persistence.
    ///
    /// Returns the new current index. The write happens in the background.
    pub fn next(&mut self) -> usize {
        self.sync_classification();

        let completed = self.sequencer.current_index();
        self.sequencer.advance();
        let index = self.sequencer.current_index();

        if index + 1 > self.store.form_position() {
            self.store.patch(ListingPatch::form_position(index + 1));
        }

        if index != completed || self.store.is_dirty() {
            self.commit(completed);
        }
        index
    }

    /// Move to the previous visible step
    pub fn back(&mut self) -> usize {
        self.sync_classification();
        self.sequencer.retreat();
        self.sequencer.current_index()
    }

    /// Jump to a step if the navigation policy allows it
    pub fn jump_to(&mut self, target: usize) -> bool {
        self.sync_classification();
        self.sequencer.jump_to(target, self.store.form_position())
    }

    fn commit(&mut self, step_index: usize) {
        let snapshot = self.store.snapshot();
        match &self.writer {
            Some(writer) => {
                writer.emit(PersistEvent::StepCommitted {
                    listing_id: snapshot.id,
                    step_index,
                    form_position: snapshot.form_position,
                    snapshot,
                });
                self.store.mark_clean();
            }
            None => {
                debug!(listing = %snapshot.id, step_index, "no writer attached, keeping changes in memory");
            }
        }
    }
}
