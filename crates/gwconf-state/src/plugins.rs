// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin materialization.
//!
//! Namespaced declarations are expanded across the entities that reference
//! them (see [`relations`](crate::relations)); cluster-scoped declarations
//! become unbound global plugins, with ambiguous names dropped entirely.

use std::collections::{BTreeMap, BTreeSet};

use gwconf_core::{PluginDeclaration, ResourceKey, ResourceKind, StoreError, Storer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::assembler::AssemblyOptions;
use crate::relations::{Binding, PluginRelations};
use crate::snapshot::ConfigurationSnapshot;

/// Why a declaration could not become a plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin name is empty")]
    EmptyName,

    #[error("declaration sets both `config` and `config_from`")]
    ConflictingConfig,

    #[error("`config_from` on a cluster-scoped declaration must name a namespace")]
    MissingConfigNamespace,

    #[error("failed to fetch configuration secret: {0}")]
    Secret(#[from] StoreError),

    #[error("secret {secret} has no key `{key}`")]
    MissingSecretKey { secret: ResourceKey, key: String },

    #[error("secret {secret} key `{key}` is not valid JSON: {source}")]
    InvalidConfigJson {
        secret: ResourceKey,
        key: String,
        source: serde_json::Error,
    },

    #[error("plugin configuration must be a JSON object")]
    ConfigNotObject,
}

/// Where a declaration lives, which decides how `config_from` is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationScope {
    Namespaced,
    Cluster,
}

fn default_enabled() -> bool {
    true
}

/// A plugin instance in the snapshot.
///
/// No binding means the plugin applies globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub config: Value,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<String>,
}

impl Plugin {
    /// Build an unbound plugin from a declaration, resolving `config_from`.
    pub fn from_declaration(
        decl: &PluginDeclaration,
        store: &dyn Storer,
        scope: DeclarationScope,
    ) -> Result<Self, PluginError> {
        let name = decl.plugin_name.trim();
        if name.is_empty() {
            return Err(PluginError::EmptyName);
        }
        let config = resolve_config(decl, store, scope)?;
        Ok(Self {
            name: name.to_string(),
            instance_name: decl.instance_name.clone(),
            config,
            enabled: !decl.disabled,
            protocols: decl.protocols.clone(),
            run_on: decl.run_on.clone(),
            service: None,
            route: None,
            consumer: None,
        })
    }

    /// Copy of this plugin attached to `binding`'s entities.
    pub fn bound_to(&self, binding: &Binding) -> Self {
        Self {
            service: binding.service.clone(),
            route: binding.route.clone(),
            consumer: binding.consumer.clone(),
            ..self.clone()
        }
    }

    pub fn is_global(&self) -> bool {
        self.service.is_none() && self.route.is_none() && self.consumer.is_none()
    }
}

fn resolve_config(
    decl: &PluginDeclaration,
    store: &dyn Storer,
    scope: DeclarationScope,
) -> Result<Value, PluginError> {
    let config = match (&decl.config, &decl.config_from) {
        (Some(_), Some(_)) => return Err(PluginError::ConflictingConfig),
        (Some(config), None) => config.clone(),
        (None, None) => return Ok(Value::Object(Map::new())),
        (None, Some(source)) => {
            // Namespaced declarations may only read secrets from their own namespace.
            let namespace = match scope {
                DeclarationScope::Namespaced => decl.meta.namespace.as_str(),
                DeclarationScope::Cluster => source
                    .namespace
                    .as_deref()
                    .filter(|ns| !ns.is_empty())
                    .ok_or(PluginError::MissingConfigNamespace)?,
            };
            let secret = store.get_secret(namespace, &source.secret)?;
            let raw = secret
                .data
                .get(&source.key)
                .ok_or_else(|| PluginError::MissingSecretKey {
                    secret: secret.meta.key(),
                    key: source.key.clone(),
                })?;
            serde_json::from_slice(raw).map_err(|e| PluginError::InvalidConfigJson {
                secret: secret.meta.key(),
                key: source.key.clone(),
                source: e,
            })?
        }
    };

    if config.is_object() {
        Ok(config)
    } else {
        Err(PluginError::ConfigNotObject)
    }
}

/// Expand every related namespaced declaration into bound plugins.
///
/// A declaration that cannot be fetched or converted drops every binding
/// that references it.
pub fn expand_plugins(store: &dyn Storer, relations: &PluginRelations) -> Vec<Plugin> {
    let mut plugins = Vec::new();

    for (key, rels) in relations.iter() {
        let decl = match store.get_plugin(&key.namespace, &key.name) {
            Ok(decl) => decl,
            Err(e) => {
                error!(plugin = %key, error = %e, "failed to fetch {}", ResourceKind::Plugin);
                continue;
            }
        };
        let plugin = match Plugin::from_declaration(&decl, store, DeclarationScope::Namespaced) {
            Ok(plugin) => plugin,
            Err(e) => {
                error!(plugin = %key, error = %e, "failed to build plugin configuration");
                continue;
            }
        };

        let bindings = rels.combinations();
        debug!(plugin = %key, bindings = bindings.len(), "expanding plugin");
        plugins.extend(bindings.iter().map(|b| plugin.bound_to(b)));
    }

    plugins
}

/// Resolve cluster-scoped global plugins.
///
/// Legacy namespaced globals are only reported. Every plugin name declared
/// by more than one cluster declaration is omitted, whichever order the
/// declarations are listed in.
pub fn global_plugins(store: &dyn Storer, warn_legacy: bool) -> Result<Vec<Plugin>, StoreError> {
    if warn_legacy {
        match store.list_legacy_global_plugins() {
            Ok(legacy) if !legacy.is_empty() => {
                let names: Vec<String> = legacy.iter().map(|p| p.meta.key().to_string()).collect();
                warn!(
                    plugins = ?names,
                    "global {} declarations are no longer applied and must be replaced with {} declarations",
                    ResourceKind::Plugin,
                    ResourceKind::ClusterPlugin
                );
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to list legacy global plugins"),
        }
    }

    let declarations = store.list_cluster_plugins()?;

    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for decl in &declarations {
        let name = decl.plugin_name.trim();
        if !name.is_empty() && !seen.insert(name) {
            duplicates.insert(name);
        }
    }
    for name in &duplicates {
        error!(plugin = %name, "multiple global declarations found for plugin, it will not be applied");
    }

    let mut resolved: BTreeMap<&str, Plugin> = BTreeMap::new();
    for decl in &declarations {
        let name = decl.plugin_name.trim();
        if name.is_empty() {
            error!(declaration = %decl.meta.name, "invalid {}: empty plugin name", ResourceKind::ClusterPlugin);
            continue;
        }
        if duplicates.contains(name) {
            continue;
        }
        match Plugin::from_declaration(decl, store, DeclarationScope::Cluster) {
            Ok(plugin) => {
                resolved.insert(name, plugin);
            }
            Err(e) => {
                error!(declaration = %decl.meta.name, error = %e, "failed to build global plugin configuration");
            }
        }
    }

    Ok(resolved.into_values().collect())
}

impl ConfigurationSnapshot {
    /// Replace the snapshot's plugins with expanded and global plugins.
    pub fn fill_plugins(&mut self, store: &dyn Storer, options: &AssemblyOptions) {
        let relations = self.plugin_relations();
        let mut plugins = expand_plugins(store, &relations);

        match global_plugins(store, options.warn_legacy_globals) {
            Ok(globals) => plugins.extend(globals),
            Err(e) => error!(error = %e, "failed to list global plugins"),
        }

        self.plugins = plugins;
    }
}
