use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{dtos::TwoFactorStatus, middleware::AuthUser, AppState};

/// Two-factor status of the current account
#[utoipa::path(
    get,
    path = "/frontend/account/two-factor",
    responses(
        (status = 200, description = "Two-factor status", body = TwoFactorStatus),
        (status = 401, description = "Missing or invalid token", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_two_factor_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TwoFactorStatus>, AppError> {
    let account = state
        .accounts
        .find_account(&user.claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Account not found")))?;

    Ok(Json(TwoFactorStatus::from(&account)))
}
