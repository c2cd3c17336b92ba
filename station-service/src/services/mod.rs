pub mod acl;
pub mod database;
pub mod jwt;
pub mod memory;
pub mod projection;
pub mod repository;

pub use acl::{Acl, PermissionCheck};
pub use database::MongoDb;
pub use jwt::{AccessTokenClaims, JwtService, TokenGrant};
pub use memory::{MemoryStore, Seed};
pub use projection::{
    read_resource, resolve_visibility, visible_fields, write_resource, ProjectionError, Visibility,
};
pub use repository::{AccountRepository, StationRepository};
