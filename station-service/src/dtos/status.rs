use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic result of a write operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Status {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Record updated.")]
    pub message: String,
    #[schema(example = "Record updated.")]
    pub formatted_message: String,
}

impl Status {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success,
            formatted_message: message.clone(),
            message,
        }
    }

    pub fn updated() -> Self {
        Self::new(true, "Record updated.")
    }
}
