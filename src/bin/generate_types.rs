//! Export TypeScript bindings for the REST API types.
//!
//! Usage: `cargo run --bin generate_types [OUT_DIR]` (defaults to `bindings/`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use ts_rs::TS;

use listing_wizard::listing::{ListingForm, ListingPatch};
use listing_wizard::rest::dto::{
    CreateSessionRequest, HealthResponse, JumpRequest, SessionResponse, StatusResponse,
    StepResponse,
};

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bindings"));

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    // export_all_to also writes every type these depend on
    HealthResponse::export_all_to(&out_dir)?;
    StatusResponse::export_all_to(&out_dir)?;
    StepResponse::export_all_to(&out_dir)?;
    CreateSessionRequest::export_all_to(&out_dir)?;
    JumpRequest::export_all_to(&out_dir)?;
    SessionResponse::export_all_to(&out_dir)?;
    ListingForm::export_all_to(&out_dir)?;
    ListingPatch::export_all_to(&out_dir)?;

    println!("TypeScript bindings written to {}", out_dir.display());
    Ok(())
}
