//! Step catalog endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::rest::dto::{StepResponse, StepsQuery};
use crate::rest::state::ApiState;
use crate::wizard::{Classification, StepSequencer};

/// List catalog steps, flagging the ones hidden for a classification
#[utoipa::path(
    get,
    path = "/api/v1/steps",
    tag = "Steps",
    params(StepsQuery),
    responses(
        (status = 200, description = "Catalog steps", body = Vec<StepResponse>)
    )
)]
pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<StepsQuery>,
) -> Json<Vec<StepResponse>> {
    let classification = query
        .classification
        .as_deref()
        .map(Classification::from_tag)
        .unwrap_or_default();

    let sequencer = StepSequencer::new(state.catalog.clone(), classification, 1);
    Json(StepResponse::all(&sequencer))
}
