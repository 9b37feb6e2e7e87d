//! Listing wizard step sequencing: catalog, classification skip rules and
//! the navigation state machine.

pub mod catalog;
pub mod classification;
pub mod sequencer;

pub use catalog::{CatalogError, Step, StepCatalog, LISTING_STEPS};
pub use classification::{compute_skip_set, Classification, SkipSet};
pub use sequencer::StepSequencer;
