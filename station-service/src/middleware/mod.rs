pub mod auth;
pub mod station;

pub use auth::{auth_middleware, AuthUser};
pub use station::{station_middleware, CurrentStation};
