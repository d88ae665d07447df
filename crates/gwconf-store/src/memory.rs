// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The in-memory store.

use std::collections::HashMap;

use gwconf_core::annotations::extract_override_name;
use gwconf_core::{
    ConsumerResource, ObjectMeta, OverrideResource, PluginDeclaration, ResourceKey, ResourceKind,
    Secret, StoreError, Storer,
};
use tracing::debug;

use crate::document::{DocumentError, ResourceDocument};

/// A [`Storer`] serving resources from memory.
///
/// Consumers keep their listing order (duplicates included); every other
/// resource is keyed by `(namespace, name)` with later entries replacing
/// earlier ones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    consumers: Vec<ConsumerResource>,
    secrets: HashMap<ResourceKey, Secret>,
    plugins: HashMap<ResourceKey, PluginDeclaration>,
    cluster_plugins: Vec<PluginDeclaration>,
    legacy_global_plugins: Vec<PluginDeclaration>,
    overrides: HashMap<ResourceKey, OverrideResource>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a parsed resource document.
    pub fn from_document(doc: ResourceDocument) -> Result<Self, DocumentError> {
        let mut store = Self::new();
        for secret in &doc.secrets {
            store.add_secret(secret.decode()?);
        }
        doc.consumers.into_iter().for_each(|c| store.add_consumer(c));
        doc.plugins.into_iter().for_each(|p| store.add_plugin(p));
        doc.cluster_plugins
            .into_iter()
            .for_each(|p| store.add_cluster_plugin(p));
        store.legacy_global_plugins = doc.legacy_global_plugins;
        doc.overrides.into_iter().for_each(|o| store.add_override(o));
        debug!(
            consumers = store.consumers.len(),
            secrets = store.secrets.len(),
            plugins = store.plugins.len(),
            cluster_plugins = store.cluster_plugins.len(),
            overrides = store.overrides.len(),
            "resource document loaded"
        );
        Ok(store)
    }

    /// Parse a JSON resource document and build a store from it.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Self::from_document(ResourceDocument::from_json(json)?)
    }

    pub fn add_consumer(&mut self, consumer: ConsumerResource) {
        self.consumers.push(consumer);
    }

    pub fn add_secret(&mut self, secret: Secret) {
        self.secrets.insert(secret.meta.key(), secret);
    }

    pub fn add_plugin(&mut self, plugin: PluginDeclaration) {
        self.plugins.insert(plugin.meta.key(), plugin);
    }

    pub fn add_cluster_plugin(&mut self, plugin: PluginDeclaration) {
        self.cluster_plugins.push(plugin);
    }

    pub fn add_legacy_global_plugin(&mut self, plugin: PluginDeclaration) {
        self.legacy_global_plugins.push(plugin);
    }

    pub fn add_override(&mut self, resource: OverrideResource) {
        self.overrides.insert(resource.meta.key(), resource);
    }
}

impl Storer for MemoryStore {
    fn list_consumers(&self) -> Vec<ConsumerResource> {
        self.consumers.clone()
    }

    fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, StoreError> {
        let key = ResourceKey::new(namespace, name);
        self.secrets
            .get(&key)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: ResourceKind::Secret,
                key,
            })
    }

    fn get_override_for(&self, owners: &[&ObjectMeta]) -> Result<Option<OverrideResource>, StoreError> {
        let Some((namespace, name)) = owners.iter().find_map(|owner| {
            extract_override_name(&owner.annotations).map(|name| (owner.namespace.as_str(), name))
        }) else {
            return Ok(None);
        };
        let key = ResourceKey::new(namespace, name);
        match self.overrides.get(&key) {
            Some(resource) => Ok(Some(resource.clone())),
            None => Err(StoreError::NotFound {
                kind: ResourceKind::Override,
                key,
            }),
        }
    }

    fn get_plugin(&self, namespace: &str, name: &str) -> Result<PluginDeclaration, StoreError> {
        let key = ResourceKey::new(namespace, name);
        self.plugins
            .get(&key)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: ResourceKind::Plugin,
                key,
            })
    }

    fn list_cluster_plugins(&self) -> Result<Vec<PluginDeclaration>, StoreError> {
        Ok(self.cluster_plugins.clone())
    }

    fn list_legacy_global_plugins(&self) -> Result<Vec<PluginDeclaration>, StoreError> {
        Ok(self.legacy_global_plugins.clone())
    }
}
