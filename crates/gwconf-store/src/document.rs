// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialized form of the resources a [`MemoryStore`](crate::MemoryStore) serves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gwconf_core::{ConsumerResource, ObjectMeta, OverrideResource, PluginDeclaration, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a resource document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid resource document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("secret {secret} key `{key}` is not valid base64: {source}")]
    Base64 {
        secret: String,
        key: String,
        source: base64::DecodeError,
    },
}

/// A secret as written in a manifest: `data` is base64, `string_data` is plain.
///
/// When a key appears in both, `string_data` wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretDocument {
    pub meta: ObjectMeta,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub string_data: BTreeMap<String, String>,
}

impl SecretDocument {
    /// Decode into a [`Secret`] with raw byte values.
    pub fn decode(&self) -> Result<Secret, DocumentError> {
        let mut data = BTreeMap::new();
        for (key, encoded) in &self.data {
            let bytes = STANDARD
                .decode(encoded.trim())
                .map_err(|source| DocumentError::Base64 {
                    secret: self.meta.key().to_string(),
                    key: key.clone(),
                    source,
                })?;
            data.insert(key.clone(), bytes);
        }
        for (key, value) in &self.string_data {
            data.insert(key.clone(), value.as_bytes().to_vec());
        }
        Ok(Secret {
            meta: self.meta.clone(),
            data,
        })
    }
}

/// Every resource kind the store serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceDocument {
    #[serde(default)]
    pub consumers: Vec<ConsumerResource>,
    #[serde(default)]
    pub secrets: Vec<SecretDocument>,
    #[serde(default)]
    pub plugins: Vec<PluginDeclaration>,
    #[serde(default)]
    pub cluster_plugins: Vec<PluginDeclaration>,
    #[serde(default)]
    pub legacy_global_plugins: Vec<PluginDeclaration>,
    #[serde(default)]
    pub overrides: Vec<OverrideResource>,
}

impl ResourceDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}
