// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity types shared by every cluster resource.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Composite `(namespace, name)` key identifying a namespaced resource.
///
/// Used directly as a map key; cluster-scoped resources carry an empty
/// namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Kind of cluster resource, used in diagnostics and store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum ResourceKind {
    #[strum(serialize = "KongConsumer")]
    Consumer,
    Secret,
    #[strum(serialize = "KongPlugin")]
    Plugin,
    #[strum(serialize = "KongClusterPlugin")]
    ClusterPlugin,
    #[strum(serialize = "KongIngress")]
    Override,
    Service,
    Ingress,
}

/// Metadata of an originating cluster object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Add an annotation, builder style.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.namespace.clone(), self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_includes_namespace() {
        assert_eq!(ResourceKey::new("default", "alice").to_string(), "default/alice");
        assert_eq!(ResourceKey::new("", "global-cors").to_string(), "global-cors");
    }

    #[test]
    fn keys_with_delimiters_do_not_collide() {
        let a = ResourceKey::new("a:b", "c");
        let b = ResourceKey::new("a", "b:c");
        assert_ne!(a, b);
    }

    #[test]
    fn object_meta_builder_sets_annotations() {
        let meta = ObjectMeta::new("default", "svc").with_annotation("konghq.com/plugins", "a,b");
        assert_eq!(meta.annotations.get("konghq.com/plugins").map(String::as_str), Some("a,b"));
        assert_eq!(meta.key(), ResourceKey::new("default", "svc"));
    }
}
