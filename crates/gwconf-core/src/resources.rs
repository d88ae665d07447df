// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cluster resources consumed by the assembler.
//!
//! These mirror the declarations a cluster operator writes: consumers with
//! credential secret references, plugin declarations (namespaced and
//! cluster-scoped), and override resources. They are plain data; all lookups
//! go through [`Storer`](crate::traits::Storer).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ObjectMeta, ResourceKey};

/// A consumer declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerResource {
    pub meta: ObjectMeta,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub custom_id: String,
    /// Names of secrets, in the consumer's namespace, holding credentials.
    #[serde(default)]
    pub credentials: Vec<String>,
}

impl ConsumerResource {
    pub fn key(&self) -> ResourceKey {
        self.meta.key()
    }
}

/// A secret with raw byte values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secret {
    pub meta: ObjectMeta,
    pub data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    /// Build a secret from string values.
    pub fn from_strings<K, V>(meta: ObjectMeta, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        Self {
            meta,
            data: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.as_ref().as_bytes().to_vec()))
                .collect(),
        }
    }
}

/// Reference to a secret key holding a plugin's JSON configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSource {
    /// Namespace of the secret; required for cluster-scoped declarations,
    /// defaults to the declaration's namespace otherwise.
    #[serde(default)]
    pub namespace: Option<String>,
    pub secret: String,
    pub key: String,
}

/// A plugin declaration, namespaced or cluster-scoped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginDeclaration {
    pub meta: ObjectMeta,
    /// Name of the gateway plugin this declaration configures (e.g. `rate-limiting`).
    #[serde(default)]
    pub plugin_name: String,
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    pub config_from: Option<ConfigSource>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub run_on: Option<String>,
}

/// Service-level (proxy) override fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyOverride {
    pub protocol: Option<String>,
    pub path: Option<String>,
    pub retries: Option<u32>,
    pub connect_timeout: Option<u32>,
    pub read_timeout: Option<u32>,
    pub write_timeout: Option<u32>,
}

/// Route-level override fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteOverride {
    pub methods: Option<Vec<String>>,
    pub headers: Option<BTreeMap<String, Vec<String>>>,
    pub protocols: Option<Vec<String>>,
    pub regex_priority: Option<i32>,
    pub strip_path: Option<bool>,
    pub preserve_host: Option<bool>,
    pub https_redirect_status_code: Option<u16>,
    pub path_handling: Option<String>,
    pub request_buffering: Option<bool>,
    pub response_buffering: Option<bool>,
}

/// Upstream-level override fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamOverride {
    pub algorithm: Option<String>,
    pub slots: Option<u32>,
    pub hash_on: Option<String>,
    pub hash_fallback: Option<String>,
    pub hash_on_header: Option<String>,
    pub host_header: Option<String>,
    pub healthchecks: Option<serde_json::Value>,
}

/// An override resource. Never creates entities, only adjusts existing ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideResource {
    pub meta: ObjectMeta,
    #[serde(default)]
    pub proxy: Option<ProxyOverride>,
    #[serde(default)]
    pub route: Option<RouteOverride>,
    #[serde(default)]
    pub upstream: Option<UpstreamOverride>,
}
