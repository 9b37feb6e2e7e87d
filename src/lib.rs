//! Listing wizard - step sequencing for multi-step property listing forms
//!
//! The library exposes the step catalog, the classification-aware
//! sequencer, listing persistence, and the REST API used by `main.rs`
//! and the `generate_types` binary.

pub mod config;
pub mod listing;
pub mod logging;
pub mod persistence;
pub mod rest;
pub mod session;
pub mod wizard;
