//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::listing::{
    Building, Cadastre, Condition, Description, Energy, Features, Layout, ListingForm,
    ListingPatch, Location, Operation, Pricing, Surfaces,
};
use crate::rest::dto::{
    CreateSessionRequest, HealthResponse, JumpRequest, SessionResponse, StatusResponse,
    StepResponse,
};
use crate::rest::error::ErrorResponse;

/// OpenAPI documentation for the listing wizard REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Listing Wizard API",
        description = "REST API for stepping through property listing forms.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Step endpoints
        crate::rest::routes::steps::list,
        // Session endpoints
        crate::rest::routes::sessions::list,
        crate::rest::routes::sessions::create,
        crate::rest::routes::sessions::get_one,
        crate::rest::routes::sessions::patch_form,
        crate::rest::routes::sessions::advance,
        crate::rest::routes::sessions::retreat,
        crate::rest::routes::sessions::jump,
        crate::rest::routes::sessions::delete,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            StatusResponse,
            StepResponse,
            SessionResponse,
            ErrorResponse,
            // Request types
            CreateSessionRequest,
            JumpRequest,
            ListingPatch,
            // Listing record
            ListingForm,
            Location,
            Cadastre,
            Layout,
            Features,
            Energy,
            Surfaces,
            Building,
            Condition,
            Operation,
            Pricing,
            Description,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Steps", description = "Wizard step catalog"),
        (name = "Sessions", description = "Wizard sessions and step navigation"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}
