//! Wizard session endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::listing::{InMemoryFormStore, ListingPatch};
use crate::rest::dto::{CreateSessionRequest, JumpRequest, SessionResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::session::WizardSession;
use crate::wizard::Classification;

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session '{}' not found", id))
}

/// List open sessions
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    responses(
        (status = 200, description = "Open sessions", body = Vec<SessionResponse>)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Json<Vec<SessionResponse>> {
    let sessions = state.sessions.read().await;
    let mut responses: Vec<SessionResponse> = sessions.values().map(SessionResponse::from).collect();
    responses.sort_by_key(|s| s.listing_id);
    Json(responses)
}

/// Open a session for a new listing or resume a persisted one
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionResponse),
        (status = 404, description = "Listing to resume not found", body = ErrorResponse),
        (status = 409, description = "Session already open", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let store = match request.listing_id {
        Some(id) => {
            if state.sessions.read().await.contains_key(&id) {
                return Err(ApiError::Conflict(format!(
                    "Session for listing '{}' is already open",
                    id
                )));
            }
            let form = state
                .gateway
                .load(id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("Listing '{}' not found", id)))?;
            InMemoryFormStore::new(form)
        }
        None => {
            let classification = request
                .classification
                .as_deref()
                .map(Classification::from_tag)
                .unwrap_or_default();
            InMemoryFormStore::fresh(classification)
        }
    };

    let session = WizardSession::open(state.catalog.clone(), Box::new(store), state.writer.clone());
    let response = SessionResponse::from(&session);

    let mut sessions = state.sessions.write().await;
    if sessions.contains_key(&response.listing_id) {
        return Err(ApiError::Conflict(format!(
            "Session for listing '{}' is already open",
            response.listing_id
        )));
    }
    sessions.insert(response.listing_id, session);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a session
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Listing id")
    ),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(SessionResponse::from(session)))
}

/// Patch the listing form of a session
#[utoipa::path(
    patch,
    path = "/api/v1/sessions/{id}/form",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Listing id")
    ),
    request_body = ListingPatch,
    responses(
        (status = 200, description = "Form updated", body = SessionResponse),
        (status = 400, description = "Patch is empty or sets the form position", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn patch_form(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<SessionResponse>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::BadRequest("Patch carries no changes".to_string()));
    }
    // Only advancing a session may raise the form position
    if patch.form_position.is_some() {
        return Err(ApiError::BadRequest(
            "form_position cannot be set through a form patch".to_string(),
        ));
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    session.patch(patch);
    Ok(Json(SessionResponse::from(&*session)))
}

/// Advance to the next visible step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/advance",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Listing id")
    ),
    responses(
        (status = 200, description = "Session after advancing", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn advance(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    session.next();
    Ok(Json(SessionResponse::from(&*session)))
}

/// Go back to the previous visible step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/retreat",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Listing id")
    ),
    responses(
        (status = 200, description = "Session after going back", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn retreat(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    session.back();
    Ok(Json(SessionResponse::from(&*session)))
}

/// Jump directly to a step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/jump",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Listing id")
    ),
    request_body = JumpRequest,
    responses(
        (status = 200, description = "Jump accepted", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Target is ahead of committed progress or hidden", body = ErrorResponse)
    )
)]
pub async fn jump(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JumpRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    if !session.jump_to(request.target) {
        return Err(ApiError::Conflict(format!(
            "Cannot jump to step {} with form position {}",
            request.target,
            session.form_position()
        )));
    }
    Ok(Json(SessionResponse::from(&*session)))
}

/// Close a session
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Listing id")
    ),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.remove(&id).ok_or_else(|| session_not_found(id))?;

    if session.store().is_dirty() {
        tracing::warn!(listing = %id, "closing session with unsaved changes");
    }
    Ok(StatusCode::NO_CONTENT)
}
