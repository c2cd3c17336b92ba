use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Account;

/// Two-factor authentication status of the current account.
///
/// Immutable once built; two values with the same flag are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct TwoFactorStatus {
    /// The current two-factor status for this account.
    #[schema(example = true)]
    two_factor_enabled: bool,
}

impl TwoFactorStatus {
    pub const fn new(two_factor_enabled: bool) -> Self {
        Self { two_factor_enabled }
    }

    pub const fn two_factor_enabled(&self) -> bool {
        self.two_factor_enabled
    }
}

impl From<&Account> for TwoFactorStatus {
    fn from(account: &Account) -> Self {
        Self::new(account.two_factor_enabled())
    }
}
