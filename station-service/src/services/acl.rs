//! Access control list built from token claims.

use std::collections::{BTreeMap, BTreeSet};

use super::jwt::AccessTokenClaims;
use crate::models::{GlobalPermission, StationPermission};

/// Answers "does the caller hold this global permission?".
///
/// Implemented for `Option<T>` so that missing permission data reads as
/// "not allowed" instead of an error.
pub trait PermissionCheck {
    fn is_allowed(&self, permission: GlobalPermission) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acl {
    global: BTreeSet<GlobalPermission>,
    stations: BTreeMap<i64, BTreeSet<StationPermission>>,
}

impl Acl {
    pub fn new(global: impl IntoIterator<Item = GlobalPermission>) -> Self {
        Self {
            global: global.into_iter().collect(),
            stations: BTreeMap::new(),
        }
    }

    pub fn with_station(
        mut self,
        station_id: i64,
        permissions: impl IntoIterator<Item = StationPermission>,
    ) -> Self {
        self.stations
            .entry(station_id)
            .or_default()
            .extend(permissions);
        self
    }

    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        claims.station_permissions.iter().fold(
            Self::new(claims.global_permissions.iter().copied()),
            |acl, (station_id, permissions)| {
                acl.with_station(*station_id, permissions.iter().copied())
            },
        )
    }

    /// An ACL granting nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Station-scoped check. Global `Stations` (and therefore `All`) grants
    /// every permission on every station; station-level `All` grants every
    /// permission on that station.
    pub fn is_allowed_on_station(&self, station_id: i64, permission: StationPermission) -> bool {
        if self.is_allowed(GlobalPermission::Stations) {
            return true;
        }

        self.stations.get(&station_id).is_some_and(|perms| {
            perms.contains(&StationPermission::All) || perms.contains(&permission)
        })
    }
}

impl PermissionCheck for Acl {
    fn is_allowed(&self, permission: GlobalPermission) -> bool {
        self.global.contains(&GlobalPermission::All) || self.global.contains(&permission)
    }
}

impl<T: PermissionCheck> PermissionCheck for Option<T> {
    fn is_allowed(&self, permission: GlobalPermission) -> bool {
        self.as_ref().is_some_and(|inner| inner.is_allowed(permission))
    }
}

impl<T: PermissionCheck + ?Sized> PermissionCheck for &T {
    fn is_allowed(&self, permission: GlobalPermission) -> bool {
        (**self).is_allowed(permission)
    }
}
