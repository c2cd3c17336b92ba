//! Permission identifiers carried in access tokens.
//!
//! Global permissions apply installation-wide; station permissions are
//! granted per station id.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum GlobalPermission {
    /// Grants every global and station permission.
    #[serde(rename = "administer all")]
    All,
    #[serde(rename = "view administration")]
    View,
    #[serde(rename = "view system logs")]
    Logs,
    #[serde(rename = "administer settings")]
    Settings,
    #[serde(rename = "administer api keys")]
    ApiKeys,
    /// Manage every station, including admin-only station fields.
    #[serde(rename = "administer stations")]
    Stations,
    #[serde(rename = "administer custom fields")]
    CustomFields,
    #[serde(rename = "administer backups")]
    Backups,
    #[serde(rename = "administer storage locations")]
    StorageLocations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum StationPermission {
    /// Grants every permission on the station it is attached to.
    #[serde(rename = "administer all")]
    All,
    #[serde(rename = "view station management")]
    View,
    #[serde(rename = "view station reports")]
    Reports,
    #[serde(rename = "view station logs")]
    Logs,
    #[serde(rename = "manage station profile")]
    Profile,
    #[serde(rename = "manage station broadcasting")]
    Broadcasting,
    #[serde(rename = "manage station streamers")]
    Streamers,
    #[serde(rename = "manage station mounts")]
    MountPoints,
    #[serde(rename = "manage station remotes")]
    RemoteRelays,
    #[serde(rename = "manage station media")]
    Media,
    #[serde(rename = "manage station automation")]
    Automation,
    #[serde(rename = "manage station web hooks")]
    WebHooks,
    #[serde(rename = "manage station podcasts")]
    Podcasts,
}
