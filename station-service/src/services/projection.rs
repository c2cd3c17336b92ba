//! Capability-gated projection of entity fields.
//!
//! [`resolve_visibility`] turns a caller's permissions into a [`Visibility`];
//! [`read_resource`] and [`write_resource`] both filter through the entity's
//! field table with that same visibility, so a caller can modify exactly the
//! fields they can see.

use serde_json::{Map, Value};
use service_core::error::AppError;
use std::collections::BTreeSet;
use thiserror::Error;

use super::acl::PermissionCheck;
use crate::models::{FieldGroups, GlobalPermission, Group, Projectable};

/// Capability that unlocks [`Group::All`].
pub const ELEVATED_PERMISSION: GlobalPermission = GlobalPermission::Stations;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Entity could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Entity did not serialize to an object")]
    NotAnObject,

    #[error("Invalid value in request body: {0}")]
    InvalidInput(#[source] serde_json::Error),
}

impl From<ProjectionError> for AppError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::InvalidInput(e) => {
                AppError::BadRequest(anyhow::anyhow!("Invalid value in request body: {}", e))
            }
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}

/// The attribute groups visible to one request.
///
/// Always contains [`Group::Id`] and [`Group::General`]; contains
/// [`Group::All`] only when built with [`Visibility::elevated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    groups: BTreeSet<Group>,
}

impl Visibility {
    pub fn base() -> Self {
        Self {
            groups: BTreeSet::from([Group::Id, Group::General]),
        }
    }

    pub fn elevated() -> Self {
        Self {
            groups: BTreeSet::from([Group::Id, Group::General, Group::All]),
        }
    }

    pub fn contains(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }

    /// Groups in `Id`, `General`, `All` order.
    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.groups.iter().copied()
    }

    /// Whether a field tagged with `field.groups` is visible.
    pub fn allows(&self, field: &FieldGroups) -> bool {
        field.groups.iter().any(|group| self.groups.contains(group))
    }
}

/// Pure function of one capability check. Missing permission data is
/// "not allowed" and yields the base groups.
pub fn resolve_visibility<P: PermissionCheck + ?Sized>(permissions: &P) -> Visibility {
    if permissions.is_allowed(ELEVATED_PERMISSION) {
        Visibility::elevated()
    } else {
        Visibility::base()
    }
}

/// Names of the fields of `E` visible under `visibility`, in table order.
pub fn visible_fields<E: Projectable>(visibility: &Visibility) -> Vec<&'static str> {
    E::field_groups()
        .iter()
        .filter(|field| visibility.allows(field))
        .map(|field| field.name)
        .collect()
}

/// Serializes `entity` keeping only the visible fields.
///
/// The readable set equals the writable set of [`write_resource`] except for
/// identity fields such as `id`, which are readable but never written.
pub fn read_resource<E: Projectable>(
    entity: &E,
    visibility: &Visibility,
) -> Result<Map<String, Value>, ProjectionError> {
    let mut full = to_object(entity)?;

    let mut projected = Map::new();
    for field in E::field_groups().iter().filter(|f| visibility.allows(f)) {
        if let Some(value) = full.remove(field.name) {
            projected.insert(field.name.to_string(), value);
        }
    }

    Ok(projected)
}

/// Copies visible, non-identity fields from `input` onto `entity`.
///
/// Keys that are unknown, hidden under `visibility`, or identity fields are
/// ignored. A non-object `input` changes nothing. Returns the names of the
/// fields that were applied. On error `entity` is left untouched.
///
/// Identity fields are the one exception to read/write symmetry: they come
/// back from [`read_resource`] but are never applied here.
pub fn write_resource<E: Projectable>(
    input: &Value,
    entity: &mut E,
    visibility: &Visibility,
) -> Result<Vec<&'static str>, ProjectionError> {
    let Value::Object(input) = input else {
        return Ok(Vec::new());
    };

    let mut current = to_object(entity)?;
    let mut applied = Vec::new();

    for field in E::field_groups()
        .iter()
        .filter(|f| !f.identity && visibility.allows(f))
    {
        if let Some(value) = input.get(field.name) {
            current.insert(field.name.to_string(), value.clone());
            applied.push(field.name);
        }
    }

    if applied.is_empty() {
        return Ok(applied);
    }

    *entity =
        serde_json::from_value(Value::Object(current)).map_err(ProjectionError::InvalidInput)?;

    Ok(applied)
}

fn to_object<E: Projectable>(entity: &E) -> Result<Map<String, Value>, ProjectionError> {
    match serde_json::to_value(entity).map_err(ProjectionError::Serialize)? {
        Value::Object(map) => Ok(map),
        _ => Err(ProjectionError::NotAnObject),
    }
}
