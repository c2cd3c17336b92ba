mod common;

use axum::http::StatusCode;
use common::{TestApp, ADMIN_ID, MANAGER_ID, OTHER_STATION_ID, STATION_ID};
use serde_json::{json, Value};
use station_service::{
    models::{GlobalPermission, StationPermission, StationRef},
    services::{StationRepository, TokenGrant},
};

const GENERAL_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "genre",
    "url",
    "timezone",
    "enable_public_page",
    "enable_on_demand",
    "enable_on_demand_download",
    "enable_requests",
    "request_delay",
    "request_threshold",
    "enable_streamers",
    "disconnect_deactivate_streamer",
    "api_history_items",
];

const ADMIN_ONLY_FIELDS: &[&str] = &[
    "short_name",
    "is_enabled",
    "frontend_type",
    "backend_type",
    "enable_hls",
    "max_bitrate",
    "max_mounts",
    "max_hls_streams",
    "radio_base_dir",
];

fn profile_uri(station: impl std::fmt::Display) -> String {
    format!("/station/{}/profile/edit", station)
}

fn keys(body: &Value) -> Vec<String> {
    let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

fn sorted(fields: &[&[&str]]) -> Vec<String> {
    let mut all: Vec<String> = fields
        .iter()
        .flat_map(|group| group.iter().map(|f| f.to_string()))
        .collect();
    all.sort();
    all
}

#[tokio::test]
async fn test_manager_sees_general_fields_only() {
    let app = TestApp::spawn();

    let (status, body) = app
        .get(&profile_uri(STATION_ID), Some(&app.manager_token()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), sorted(&[GENERAL_FIELDS]));
    assert_eq!(body["id"], json!(STATION_ID));
    assert_eq!(body["name"], json!("Night Owl Radio"));
    assert_eq!(body["description"], json!("Late night jazz"));
}

#[tokio::test]
async fn test_station_administrators_see_all_fields() {
    let app = TestApp::spawn();

    for grant in [
        TokenGrant::global([GlobalPermission::Stations]),
        TokenGrant::global([GlobalPermission::All]),
    ] {
        let token = app.token(ADMIN_ID, grant);
        let (status, body) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(keys(&body), sorted(&[GENERAL_FIELDS, ADMIN_ONLY_FIELDS]));
        assert_eq!(body["max_bitrate"], json!(192));
        assert_eq!(body["short_name"], json!("night_owl_radio"));
    }
}

#[tokio::test]
async fn test_internal_fields_never_exposed() {
    let app = TestApp::spawn();

    let (_, body) = app
        .get(&profile_uri(STATION_ID), Some(&app.admin_token()))
        .await;

    assert!(body.get("adapter_api_key").is_none());
    assert!(body.get("needs_restart").is_none());
}

#[tokio::test]
async fn test_station_all_does_not_unlock_admin_fields() {
    let app = TestApp::spawn();
    let token = app.token(
        MANAGER_ID,
        TokenGrant::default().station(STATION_ID, [StationPermission::All]),
    );

    let (status, body) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), sorted(&[GENERAL_FIELDS]));
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let app = TestApp::spawn();
    let token = app.manager_token();

    let (_, first) = app.get(&profile_uri(STATION_ID), Some(&token)).await;
    let (_, second) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_lookup_by_short_name() {
    let app = TestApp::spawn();
    let token = app.admin_token();

    let (status, by_name) = app.get(&profile_uri("night_owl_radio"), Some(&token)).await;
    let (_, by_id) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_name, by_id);
}

#[tokio::test]
async fn test_manager_put_applies_general_and_drops_admin_fields() {
    let app = TestApp::spawn();

    let (status, body) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.manager_token()),
            json!({
                "name": "Night Owl Jazz",
                "genre": "Jazz",
                "max_bitrate": 320,
                "short_name": "hijacked",
                "adapter_api_key": "stolen",
                "needs_restart": true,
                "listeners": 9000
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Record updated.",
            "formatted_message": "Record updated."
        })
    );

    let stored = app
        .store
        .find_station(&StationRef::Id(STATION_ID))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Night Owl Jazz");
    assert_eq!(stored.genre.as_deref(), Some("Jazz"));
    assert_eq!(stored.max_bitrate, 192);
    assert_eq!(stored.short_name, "night_owl_radio");
    assert_eq!(stored.adapter_api_key.as_deref(), Some("adapter-secret"));
    assert!(!stored.needs_restart);
}

#[tokio::test]
async fn test_admin_put_applies_admin_fields() {
    let app = TestApp::spawn();

    let (status, _) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.admin_token()),
            json!({ "max_bitrate": 320, "frontend_type": "shoutcast", "genre": "Jazz" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = app
        .store
        .find_station(&StationRef::Id(STATION_ID))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.max_bitrate, 320);
    assert_eq!(stored.genre.as_deref(), Some("Jazz"));
    assert!(stored.needs_restart);
}

#[tokio::test]
async fn test_put_cannot_change_id() {
    let app = TestApp::spawn();

    let (status, _) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.admin_token()),
            json!({ "id": 77, "name": "Renamed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = app
        .store
        .find_station(&StationRef::Id(STATION_ID))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Renamed");
    assert!(app
        .store
        .find_station(&StationRef::Id(77))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_put_readback_reflects_visible_changes() {
    let app = TestApp::spawn();
    let token = app.manager_token();

    let (_, before) = app.get(&profile_uri(STATION_ID), Some(&token)).await;
    app.put(
        &profile_uri(STATION_ID),
        Some(&token),
        json!({ "enable_requests": true, "request_delay": 10 }),
    )
    .await;
    let (_, after) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

    assert_eq!(after["enable_requests"], json!(true));
    assert_eq!(after["request_delay"], json!(10));
    assert_eq!(after["name"], before["name"]);
    assert_eq!(keys(&after), keys(&before));
}

#[tokio::test]
async fn test_put_non_object_body_changes_nothing() {
    let app = TestApp::spawn();
    let token = app.manager_token();

    let (_, before) = app.get(&profile_uri(STATION_ID), Some(&token)).await;
    for body in [Value::Null, json!([1, 2, 3]), json!("name")] {
        let (status, _) = app.put(&profile_uri(STATION_ID), Some(&token), body).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, after) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

    assert_eq!(before, after);
}

#[tokio::test]
async fn test_put_wrong_type_is_bad_request() {
    let app = TestApp::spawn();

    let (status, body) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.manager_token()),
            json!({ "enable_requests": "sometimes" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid value"));
}

#[tokio::test]
async fn test_put_invalid_station_is_rejected_and_not_saved() {
    let app = TestApp::spawn();

    let (status, body) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.manager_token()),
            json!({ "name": "", "genre": "Jazz" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], json!("Validation error"));

    let stored = app
        .store
        .find_station(&StationRef::Id(STATION_ID))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Night Owl Radio");
    assert_eq!(stored.genre, None);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::spawn();

    let (status, _) = app.get(&profile_uri(STATION_ID), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .put(&profile_uri(STATION_ID), None, json!({ "name": "x" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = TestApp::spawn();

    let (status, _) = app
        .get(&profile_uri(STATION_ID), Some("not-a-jwt"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_station_is_forbidden() {
    let app = TestApp::spawn();

    let (status, body) = app
        .get(&profile_uri(OTHER_STATION_ID), Some(&app.manager_token()))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        json!("You do not have permission to access this portion of the site.")
    );
}

#[tokio::test]
async fn test_unrelated_permission_is_forbidden() {
    let app = TestApp::spawn();
    let token = app.token(
        MANAGER_ID,
        TokenGrant::global([GlobalPermission::Settings]).station(STATION_ID, [StationPermission::Media]),
    );

    let (status, _) = app
        .put(&profile_uri(STATION_ID), Some(&token), json!({ "name": "x" }))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_station_is_not_found() {
    let app = TestApp::spawn();
    let token = app.admin_token();

    let (status, _) = app.get(&profile_uri(999), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&profile_uri("no_such_station"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn stored_short_name(app: &TestApp, id: i64) -> String {
    app.store
        .find_station(&StationRef::Id(id))
        .await
        .unwrap()
        .unwrap()
        .short_name
}

#[tokio::test]
async fn test_put_duplicate_short_name_is_rejected() {
    let app = TestApp::spawn();

    for short_name in ["early_bird_fm", "Early Bird FM"] {
        let (status, body) = app
            .put(
                &profile_uri(STATION_ID),
                Some(&app.admin_token()),
                json!({ "short_name": short_name }),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!("Validation error"));
    }

    assert_eq!(stored_short_name(&app, STATION_ID).await, "night_owl_radio");
    assert_eq!(stored_short_name(&app, OTHER_STATION_ID).await, "early_bird_fm");

    let (status, body) = app
        .get(&profile_uri("early_bird_fm"), Some(&app.admin_token()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(OTHER_STATION_ID));
}

#[tokio::test]
async fn test_put_short_name_is_slugified() {
    let app = TestApp::spawn();

    let (status, _) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.admin_token()),
            json!({ "short_name": "Has Spaces/../x" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_short_name(&app, STATION_ID).await, "has_spaces_x");

    let (status, body) = app
        .get(&profile_uri("has_spaces_x"), Some(&app.admin_token()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(STATION_ID));
}

#[tokio::test]
async fn test_put_numeric_short_name_stays_reachable() {
    let app = TestApp::spawn();
    let token = app.admin_token();

    let (status, _) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&token),
            json!({ "short_name": "2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_short_name(&app, STATION_ID).await, "station_2");

    let (_, by_name) = app.get(&profile_uri("station_2"), Some(&token)).await;
    assert_eq!(by_name["id"], json!(STATION_ID));

    let (_, by_id) = app.get(&profile_uri(OTHER_STATION_ID), Some(&token)).await;
    assert_eq!(by_id["short_name"], json!("early_bird_fm"));
}

#[tokio::test]
async fn test_put_same_short_name_is_allowed() {
    let app = TestApp::spawn();

    let (status, _) = app
        .put(
            &profile_uri(STATION_ID),
            Some(&app.admin_token()),
            json!({ "short_name": "night_owl_radio", "genre": "Jazz" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_put_empty_body_is_noop() {
    let app = TestApp::spawn();
    let token = app.manager_token();

    let (_, before) = app.get(&profile_uri(STATION_ID), Some(&token)).await;
    let (status, body) = app.put_raw(&profile_uri(STATION_ID), Some(&token), "").await;
    let (_, after) = app.get(&profile_uri(STATION_ID), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Record updated."));
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_put_malformed_json_is_bad_request() {
    let app = TestApp::spawn();

    let (status, body) = app
        .put_raw(&profile_uri(STATION_ID), Some(&app.manager_token()), "{name")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed JSON body"));
}
