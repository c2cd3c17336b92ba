use axum::{body::Bytes, extract::State, Json};
use serde_json::{Map, Value};
use service_core::error::AppError;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dtos::Status,
    middleware::{AuthUser, CurrentStation},
    models::{station::short_name_for, Station, StationRef},
    services::{read_resource, resolve_visibility, write_resource, StationRepository},
    AppState,
};

/// Editable station profile
///
/// Fields returned depend on the caller: station managers see the general
/// profile, holders of "administer stations" also see broadcasting settings.
#[utoipa::path(
    get,
    path = "/station/{station_id}/profile/edit",
    params(
        ("station_id" = String, Path, description = "Station id or short name")
    ),
    responses(
        (status = 200, description = "Visible station fields", body = Object),
        (status = 401, description = "Missing or invalid token", body = crate::dtos::ErrorResponse),
        (status = 403, description = "No profile permission on this station", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Station not found", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stations"
)]
pub async fn get_profile_edit(
    user: AuthUser,
    CurrentStation(station): CurrentStation,
) -> Result<Json<Map<String, Value>>, AppError> {
    let visibility = resolve_visibility(&user.acl);
    let profile = read_resource(&station, &visibility)?;

    tracing::debug!(
        station_id = station.id,
        fields = profile.len(),
        "Station profile read"
    );

    Ok(Json(profile))
}

/// Update station profile
///
/// Applies the fields of the body the caller is allowed to see. Hidden and
/// unknown fields are ignored.
#[utoipa::path(
    put,
    path = "/station/{station_id}/profile/edit",
    params(
        ("station_id" = String, Path, description = "Station id or short name")
    ),
    request_body(content = Object, description = "Station fields to change"),
    responses(
        (status = 200, description = "Profile updated", body = Status),
        (status = 400, description = "Malformed field value", body = crate::dtos::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::dtos::ErrorResponse),
        (status = 403, description = "No profile permission on this station", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Station not found", body = crate::dtos::ErrorResponse),
        (status = 422, description = "Resulting station is invalid", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Stations"
)]
pub async fn put_profile_edit(
    State(state): State<AppState>,
    user: AuthUser,
    CurrentStation(mut station): CurrentStation,
    body: Bytes,
) -> Result<Json<Status>, AppError> {
    let body = parse_body(&body)?;
    let visibility = resolve_visibility(&user.acl);
    let before = station.clone();

    let applied = write_resource(&body, &mut station, &visibility)?;
    if station.short_name != before.short_name {
        station.short_name = short_name_for(&station.short_name);
    }
    station.validate()?;

    if station.short_name != before.short_name {
        ensure_short_name_available(state.stations.as_ref(), &station).await?;
    }

    if station.adapter_settings_changed(&before) {
        station.needs_restart = true;
    }

    if station != before {
        state.stations.save_station(&station).await?;
        metrics::counter!("station_profile_updates_total").increment(1);
    }

    tracing::info!(
        account_id = %user.claims.sub,
        station_id = station.id,
        fields = ?applied,
        needs_restart = station.needs_restart,
        "Station profile updated"
    );

    Ok(Json(Status::updated()))
}

/// An empty body is an empty update; anything else must be JSON.
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Malformed JSON body: {}", e)))
}

async fn ensure_short_name_available(
    stations: &dyn StationRepository,
    station: &Station,
) -> Result<(), AppError> {
    let existing = stations
        .find_station(&StationRef::ShortName(station.short_name.clone()))
        .await?;

    match existing {
        Some(other) if other.id != station.id => {
            let mut error = ValidationError::new("unique");
            error.message = Some("Short name is already used by another station".into());

            let mut errors = ValidationErrors::new();
            errors.add("short_name", error);
            Err(AppError::ValidationError(errors))
        }
        _ => Ok(()),
    }
}
