use serde::{Deserialize, Serialize};

/// User account as far as this service needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Matches the `sub` claim of access tokens.
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_factor_secret: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            two_factor_secret: None,
        }
    }

    pub fn with_two_factor_secret(mut self, secret: impl Into<String>) -> Self {
        self.two_factor_secret = Some(secret.into());
        self
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.two_factor_secret
            .as_deref()
            .is_some_and(|secret| !secret.is_empty())
    }
}
