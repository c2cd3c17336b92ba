pub mod account;
pub mod status;

pub use account::TwoFactorStatus;
pub use status::Status;

use serde::Serialize;
use utoipa::ToSchema;

/// Error body documented for OpenAPI; produced by `service_core::error::AppError`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "You do not have permission to access this portion of the site.")]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
