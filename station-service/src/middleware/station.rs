use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use super::auth::AuthUser;
use crate::{
    models::{Station, StationPermission, StationRef},
    AppState,
};

pub const ACCESS_DENIED: &str = "You do not have permission to access this portion of the site.";

/// Station addressed by the `{station_id}` path segment, loaded and
/// permission-checked by [`station_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentStation(pub Station);

/// Resolves `{station_id}` (numeric id or short name) and requires
/// [`StationPermission::Profile`] on it. Runs after [`super::auth_middleware`].
pub async fn station_middleware(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req.extensions().get::<AuthUser>().cloned().ok_or_else(|| {
        AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
    })?;

    let station_ref = StationRef::parse(&station_id);
    let station = state
        .stations
        .find_station(&station_ref)
        .await?
        .ok_or_else(|| {
            tracing::debug!(station = %station_ref, "Station not found");
            AppError::NotFound(anyhow::anyhow!("Station not found"))
        })?;

    if !user
        .acl
        .is_allowed_on_station(station.id, StationPermission::Profile)
    {
        tracing::warn!(
            account_id = %user.claims.sub,
            station_id = station.id,
            "Station profile access denied"
        );
        return Err(AppError::Forbidden(anyhow::anyhow!(ACCESS_DENIED)));
    }

    req.extensions_mut().insert(CurrentStation(station));

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentStation
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentStation>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Station missing from request extensions"
                ))
            })
    }
}
