// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end assembly tests.
//!
//! `TestHarness` pairs an in-memory store with an assembler and a seed
//! snapshot. Every call to [`TestHarness::assemble`] starts from the same seed,
//! so passes can be re-run to check idempotence.

use gwconf_config::model::AssemblerConfig;
use gwconf_core::{ConsumerResource, GwconfError, OverrideResource, PluginDeclaration, Secret};
use gwconf_state::{Assembler, Certificate, ConfigurationSnapshot, Service, Upstream};
use gwconf_store::MemoryStore;

/// Builder for creating test environments.
pub struct TestHarnessBuilder {
    store: MemoryStore,
    seed: ConfigurationSnapshot,
    config: AssemblerConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            seed: ConfigurationSnapshot::default(),
            config: AssemblerConfig::default(),
        }
    }

    pub fn with_consumer(mut self, consumer: ConsumerResource) -> Self {
        self.store.add_consumer(consumer);
        self
    }

    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.store.add_secret(secret);
        self
    }

    pub fn with_plugin(mut self, plugin: PluginDeclaration) -> Self {
        self.store.add_plugin(plugin);
        self
    }

    pub fn with_cluster_plugin(mut self, plugin: PluginDeclaration) -> Self {
        self.store.add_cluster_plugin(plugin);
        self
    }

    pub fn with_legacy_global_plugin(mut self, plugin: PluginDeclaration) -> Self {
        self.store.add_legacy_global_plugin(plugin);
        self
    }

    pub fn with_override(mut self, resource: OverrideResource) -> Self {
        self.store.add_override(resource);
        self
    }

    /// Add a translated service to the seed snapshot.
    pub fn with_service(mut self, service: Service) -> Self {
        self.seed.services.push(service);
        self
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.seed.upstreams.push(upstream);
        self
    }

    pub fn with_certificate(mut self, certificate: Certificate) -> Self {
        self.seed.certificates.push(certificate);
        self
    }

    /// Override the gateway version stamped onto snapshots.
    pub fn with_gateway_version(mut self, version: &str) -> Self {
        self.config.gateway_version = version.to_string();
        self
    }

    pub fn without_legacy_warning(mut self) -> Self {
        self.config.warn_legacy_globals = false;
        self
    }

    /// Build the harness. Fails only on an invalid gateway version.
    pub fn build(self) -> Result<TestHarness, GwconfError> {
        let assembler = Assembler::new(&self.config)?;
        tracing::debug!(version = %assembler.version(), "test harness ready");
        Ok(TestHarness {
            store: self.store,
            seed: self.seed,
            assembler,
        })
    }
}

/// A store, an assembler and the snapshot they complete.
pub struct TestHarness {
    store: MemoryStore,
    seed: ConfigurationSnapshot,
    assembler: Assembler,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Assemble a fresh copy of the seed snapshot.
    pub fn assemble(&self) -> ConfigurationSnapshot {
        let mut snapshot = self.seed.clone();
        self.assembler.assemble(&mut snapshot, &self.store);
        snapshot
    }

    /// Run the assembly again over an already assembled snapshot.
    pub fn reassemble(&self, snapshot: &mut ConfigurationSnapshot) {
        self.assembler.assemble(snapshot, &self.store);
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }
}
