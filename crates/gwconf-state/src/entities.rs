// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway entities produced by the upstream translator.
//!
//! Services, routes and upstreams arrive with defaults already synthesized;
//! each keeps the cluster objects it was derived from so overrides and plugin
//! annotations can be traced back to them.

use std::collections::BTreeMap;

use gwconf_core::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Placeholder written over secret material in sanitized copies.
pub const REDACTED: &str = "[REDACTED]";

fn default_protocol() -> String {
    "http".to_string()
}

/// A gateway service and its routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub connect_timeout: Option<u32>,
    #[serde(default)]
    pub read_timeout: Option<u32>,
    #[serde(default)]
    pub write_timeout: Option<u32>,
    #[serde(default)]
    pub routes: Vec<Route>,
    /// Cluster services backing this gateway service.
    #[serde(default)]
    pub backing_services: Vec<ObjectMeta>,
}

impl Service {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: None,
            protocol: default_protocol(),
            path: None,
            retries: None,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            routes: Vec::new(),
            backing_services: Vec::new(),
        }
    }
}

/// A gateway route, derived from one ingress-like object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub regex_priority: Option<i32>,
    #[serde(default)]
    pub strip_path: Option<bool>,
    #[serde(default)]
    pub preserve_host: Option<bool>,
    #[serde(default)]
    pub https_redirect_status_code: Option<u16>,
    #[serde(default)]
    pub path_handling: Option<String>,
    #[serde(default)]
    pub request_buffering: Option<bool>,
    #[serde(default)]
    pub response_buffering: Option<bool>,
    /// The object this route was derived from.
    pub origin: ObjectMeta,
}

impl Route {
    pub fn new(name: impl Into<String>, origin: ObjectMeta) -> Self {
        Self {
            name: name.into(),
            origin,
            ..Default::default()
        }
    }
}

/// A load-balancing target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub target: String,
    #[serde(default)]
    pub weight: Option<u32>,
}

/// A gateway upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    pub name: String,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub slots: Option<u32>,
    #[serde(default)]
    pub hash_on: Option<String>,
    #[serde(default)]
    pub hash_fallback: Option<String>,
    #[serde(default)]
    pub hash_on_header: Option<String>,
    #[serde(default)]
    pub host_header: Option<String>,
    #[serde(default)]
    pub healthchecks: Option<serde_json::Value>,
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Cluster services backing this upstream.
    #[serde(default)]
    pub backing_services: Vec<ObjectMeta>,
}

impl Upstream {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A TLS certificate with its private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub cert: String,
    pub key: String,
    #[serde(default)]
    pub snis: Vec<String>,
}

impl Certificate {
    /// Deep copy with the private key redacted.
    pub fn sanitized_copy(&self) -> Self {
        Self {
            id: self.id.clone(),
            cert: self.cert.clone(),
            key: REDACTED.to_string(),
            snis: self.snis.clone(),
        }
    }
}

/// A CA certificate. Carries no private material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaCertificate {
    pub id: String,
    pub cert: String,
    #[serde(default)]
    pub cert_digest: Option<String>,
}
