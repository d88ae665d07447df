// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only store trait over cluster resources and secrets.

use crate::error::StoreError;
use crate::resources::{ConsumerResource, OverrideResource, PluginDeclaration, Secret};
use crate::types::ObjectMeta;

/// Read-only view of an already-synchronized resource cache.
///
/// Every call is a synchronous lookup. Implementations must present one
/// consistent view for the duration of an assembly cycle.
pub trait Storer {
    /// List every consumer declaration.
    fn list_consumers(&self) -> Vec<ConsumerResource>;

    /// Fetch a secret by namespace and name.
    fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, StoreError>;

    /// Find the override resource attached to any of the given owner objects.
    ///
    /// Returns `Ok(None)` when no owner references an override, and an error
    /// when a referenced override cannot be resolved.
    fn get_override_for(&self, owners: &[&ObjectMeta]) -> Result<Option<OverrideResource>, StoreError>;

    /// Fetch a namespaced plugin declaration.
    fn get_plugin(&self, namespace: &str, name: &str) -> Result<PluginDeclaration, StoreError>;

    /// List cluster-scoped plugin declarations marked global.
    fn list_cluster_plugins(&self) -> Result<Vec<PluginDeclaration>, StoreError>;

    /// List namespaced plugin declarations still carrying the legacy global marker.
    ///
    /// These are no longer applied; callers only use them to warn.
    fn list_legacy_global_plugins(&self) -> Result<Vec<PluginDeclaration>, StoreError>;
}
