//! Attribute groups: the tags that decide which entity fields a caller can
//! see or modify.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Identity fields.
    Id,
    /// Fields any station manager may edit.
    General,
    /// Every exposed field, including admin-only ones.
    All,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Id => "id",
            Group::General => "general",
            Group::All => "all",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an entity's field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldGroups {
    /// Serialized field name.
    pub name: &'static str,
    pub groups: &'static [Group],
    /// Identity fields are projected but never overwritten from input.
    pub identity: bool,
}

impl FieldGroups {
    pub const fn new(name: &'static str, groups: &'static [Group]) -> Self {
        Self {
            name,
            groups,
            identity: false,
        }
    }

    pub const fn identity(name: &'static str, groups: &'static [Group]) -> Self {
        Self {
            name,
            groups,
            identity: true,
        }
    }
}

/// An entity whose serialized fields are tagged with groups.
///
/// The entity must serialize to a JSON object. Fields missing from
/// [`Projectable::field_groups`] are never exposed nor accepted.
pub trait Projectable: Serialize + DeserializeOwned {
    fn field_groups() -> &'static [FieldGroups];
}
