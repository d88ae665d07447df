// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration snapshot handed to the gateway sync engine.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::consumer::Consumer;
use crate::entities::{CaCertificate, Certificate, Service, Upstream};
use crate::plugins::Plugin;

fn default_version() -> Version {
    Version::new(0, 0, 0)
}

/// Aggregate root of one assembly cycle.
///
/// Services, upstreams and certificates are populated by the translator
/// before assembly; consumers and plugins are owned by the assembler passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub upstreams: Vec<Upstream>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub ca_certificates: Vec<CaCertificate>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub consumers: Vec<Consumer>,
    /// Gateway schema version the snapshot targets.
    #[serde(default = "default_version")]
    pub version: Version,
}

impl Default for ConfigurationSnapshot {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            upstreams: Vec::new(),
            certificates: Vec::new(),
            ca_certificates: Vec::new(),
            plugins: Vec::new(),
            consumers: Vec::new(),
            version: default_version(),
        }
    }
}

impl ConfigurationSnapshot {
    /// Deep copy safe to log or print.
    ///
    /// Credential secrets and certificate private keys are replaced with
    /// [`REDACTED`](crate::entities::REDACTED). The receiver is untouched and
    /// sanitizing a sanitized copy changes nothing.
    pub fn sanitized_copy(&self) -> Self {
        Self {
            services: self.services.clone(),
            upstreams: self.upstreams.clone(),
            certificates: self.certificates.iter().map(Certificate::sanitized_copy).collect(),
            ca_certificates: self.ca_certificates.clone(),
            plugins: self.plugins.clone(),
            consumers: self.consumers.iter().map(Consumer::sanitized_copy).collect(),
            version: self.version.clone(),
        }
    }
}
