pub mod account;
pub mod group;
pub mod permission;
pub mod station;

pub use account::Account;
pub use group::{FieldGroups, Group, Projectable};
pub use permission::{GlobalPermission, StationPermission};
pub use station::{BackendType, FrontendType, Station, StationRef};
