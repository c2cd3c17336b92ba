use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::group::{FieldGroups, Group, Projectable};

const ID: &[Group] = &[Group::Id, Group::All];
const GENERAL: &[Group] = &[Group::General, Group::All];
const ADMIN: &[Group] = &[Group::All];

/// Field table for [`Station`]. `needs_restart` and `adapter_api_key` are
/// internal and never leave the service.
static STATION_FIELDS: &[FieldGroups] = &[
    FieldGroups::identity("id", ID),
    FieldGroups::new("name", GENERAL),
    FieldGroups::new("description", GENERAL),
    FieldGroups::new("genre", GENERAL),
    FieldGroups::new("url", GENERAL),
    FieldGroups::new("timezone", GENERAL),
    FieldGroups::new("enable_public_page", GENERAL),
    FieldGroups::new("enable_on_demand", GENERAL),
    FieldGroups::new("enable_on_demand_download", GENERAL),
    FieldGroups::new("enable_requests", GENERAL),
    FieldGroups::new("request_delay", GENERAL),
    FieldGroups::new("request_threshold", GENERAL),
    FieldGroups::new("enable_streamers", GENERAL),
    FieldGroups::new("disconnect_deactivate_streamer", GENERAL),
    FieldGroups::new("api_history_items", GENERAL),
    FieldGroups::new("short_name", ADMIN),
    FieldGroups::new("is_enabled", ADMIN),
    FieldGroups::new("frontend_type", ADMIN),
    FieldGroups::new("backend_type", ADMIN),
    FieldGroups::new("enable_hls", ADMIN),
    FieldGroups::new("max_bitrate", ADMIN),
    FieldGroups::new("max_mounts", ADMIN),
    FieldGroups::new("max_hls_streams", ADMIN),
    FieldGroups::new("radio_base_dir", ADMIN),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FrontendType {
    Icecast,
    Shoutcast,
    Rsas,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    Liquidsoap,
    None,
}

/// Station entity as stored by the repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Station {
    #[schema(example = 1)]
    pub id: i64,

    #[validate(length(min = 1, max = 100, message = "Station name must be 1-100 characters"))]
    #[schema(example = "Night Owl Radio")]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Short name must be 1-100 characters"))]
    #[schema(example = "night_owl_radio")]
    pub short_name: String,

    pub is_enabled: bool,
    pub frontend_type: FrontendType,
    pub backend_type: BackendType,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub genre: Option<String>,

    #[validate(url(message = "Station URL must be a valid URL"))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Timezone is required"))]
    #[schema(example = "UTC")]
    pub timezone: String,

    pub enable_public_page: bool,
    pub enable_on_demand: bool,
    pub enable_on_demand_download: bool,
    pub enable_requests: bool,

    /// Minutes between requests from the same listener.
    #[validate(range(min = 0, max = 1440))]
    pub request_delay: Option<i32>,

    /// Minutes before a song can be requested again.
    #[validate(range(min = 0, max = 1440))]
    pub request_threshold: Option<i32>,

    pub enable_streamers: bool,

    /// Seconds a disconnected streamer stays deactivated.
    #[validate(range(min = 0))]
    pub disconnect_deactivate_streamer: i32,

    #[validate(range(min = 0, max = 25))]
    pub api_history_items: i32,

    pub enable_hls: bool,

    #[validate(range(min = 0))]
    pub max_bitrate: i32,

    #[validate(range(min = 0))]
    pub max_mounts: i32,

    #[validate(range(min = 0))]
    pub max_hls_streams: i32,

    pub radio_base_dir: Option<String>,

    #[serde(default)]
    pub needs_restart: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(write_only)]
    pub adapter_api_key: Option<String>,
}

impl Station {
    /// A new, enabled station with default broadcasting settings.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        let short_name = short_name_for(&name);

        Self {
            id,
            name,
            short_name,
            is_enabled: true,
            frontend_type: FrontendType::Icecast,
            backend_type: BackendType::Liquidsoap,
            description: None,
            genre: None,
            url: None,
            timezone: "UTC".to_string(),
            enable_public_page: true,
            enable_on_demand: false,
            enable_on_demand_download: true,
            enable_requests: false,
            request_delay: Some(5),
            request_threshold: Some(15),
            enable_streamers: false,
            disconnect_deactivate_streamer: 0,
            api_history_items: 5,
            enable_hls: false,
            max_bitrate: 0,
            max_mounts: 0,
            max_hls_streams: 0,
            radio_base_dir: None,
            needs_restart: false,
            adapter_api_key: None,
        }
    }
}

impl Station {
    /// Whether moving from `before` to `self` changes settings the broadcast
    /// adapters only pick up on restart.
    pub fn adapter_settings_changed(&self, before: &Station) -> bool {
        self.short_name != before.short_name
            || self.is_enabled != before.is_enabled
            || self.frontend_type != before.frontend_type
            || self.backend_type != before.backend_type
            || self.enable_hls != before.enable_hls
            || self.max_bitrate != before.max_bitrate
            || self.max_mounts != before.max_mounts
            || self.max_hls_streams != before.max_hls_streams
            || self.radio_base_dir != before.radio_base_dir
            || self.enable_streamers != before.enable_streamers
            || self.enable_requests != before.enable_requests
    }
}

impl Projectable for Station {
    fn field_groups() -> &'static [FieldGroups] {
        STATION_FIELDS
    }
}

/// URL-safe short name: lowercase ASCII alphanumerics joined by `_`.
///
/// An all-digit result is prefixed with `station_` so it can never be read
/// back as a numeric id by [`StationRef::parse`].
pub fn short_name_for(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        "station".to_string()
    } else if slug.bytes().all(|b| b.is_ascii_digit()) {
        format!("station_{}", slug)
    } else {
        slug
    }
}

/// How a path segment identifies a station: numeric id or short name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationRef {
    Id(i64),
    ShortName(String),
}

impl StationRef {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => StationRef::Id(id),
            Err(_) => StationRef::ShortName(raw.to_string()),
        }
    }

    pub fn matches(&self, station: &Station) -> bool {
        match self {
            StationRef::Id(id) => station.id == *id,
            StationRef::ShortName(name) => station.short_name == *name,
        }
    }
}

impl std::fmt::Display for StationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationRef::Id(id) => write!(f, "{}", id),
            StationRef::ShortName(name) => f.write_str(name),
        }
    }
}
