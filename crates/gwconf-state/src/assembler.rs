// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration of the assembly passes.

use gwconf_config::model::AssemblerConfig;
use gwconf_core::{GwconfError, Storer};
use semver::Version;
use tracing::{debug, info};

use crate::snapshot::ConfigurationSnapshot;

/// Knobs that change how the passes behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Warn when legacy namespaced global plugins are present.
    pub warn_legacy_globals: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            warn_legacy_globals: true,
        }
    }
}

/// Runs the consumer, override and plugin passes over a snapshot.
#[derive(Debug, Clone)]
pub struct Assembler {
    version: Version,
    options: AssemblyOptions,
}

impl Assembler {
    /// Build an assembler from validated configuration.
    pub fn new(config: &AssemblerConfig) -> Result<Self, GwconfError> {
        let version = Version::parse(&config.gateway_version).map_err(|e| {
            GwconfError::Config(format!(
                "gateway_version `{}` is not valid semver: {e}",
                config.gateway_version
            ))
        })?;
        Ok(Self {
            version,
            options: AssemblyOptions {
                warn_legacy_globals: config.warn_legacy_globals,
            },
        })
    }

    pub fn with_options(version: Version, options: AssemblyOptions) -> Self {
        Self { version, options }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Complete `snapshot` from the store.
    ///
    /// Consumers run first so plugin relations can see them. No input can
    /// make this fail; every rejected resource is logged and skipped.
    pub fn assemble(&self, snapshot: &mut ConfigurationSnapshot, store: &dyn Storer) {
        snapshot.version = self.version.clone();

        snapshot.fill_consumers_and_credentials(store);
        debug!(consumers = snapshot.consumers.len(), "consumers resolved");

        snapshot.fill_overrides(store);
        debug!(services = snapshot.services.len(), upstreams = snapshot.upstreams.len(), "overrides applied");

        snapshot.fill_plugins(store, &self.options);

        info!(
            version = %snapshot.version,
            services = snapshot.services.len(),
            consumers = snapshot.consumers.len(),
            plugins = snapshot.plugins.len(),
            "snapshot assembled"
        );
    }
}
