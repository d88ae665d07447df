// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer identities and their credentials.

use std::collections::BTreeMap;

use gwconf_core::{ConsumerResource, ResourceKey, Storer};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::credential::Credential;
use crate::snapshot::ConfigurationSnapshot;

/// A materialized consumer. Always has a username or a custom id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub credentials: Vec<Credential>,
    /// The declaration this consumer came from.
    #[serde(skip)]
    pub origin: ConsumerResource,
}

impl Consumer {
    /// Build a consumer with no credentials, or `None` when the resource has
    /// no identity.
    pub fn from_resource(resource: &ConsumerResource) -> Option<Self> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let username = non_empty(&resource.username);
        let custom_id = non_empty(&resource.custom_id);
        if username.is_none() && custom_id.is_none() {
            return None;
        }
        Some(Self {
            username,
            custom_id,
            credentials: Vec::new(),
            origin: resource.clone(),
        })
    }

    /// Identifier used when binding plugins: the username, else the custom id.
    pub fn identifier(&self) -> Option<&str> {
        self.username.as_deref().or(self.custom_id.as_deref())
    }

    /// Deep copy with every credential's secret material redacted.
    pub fn sanitized_copy(&self) -> Self {
        Self {
            username: self.username.clone(),
            custom_id: self.custom_id.clone(),
            credentials: self.credentials.iter().map(Credential::sanitized_copy).collect(),
            origin: self.origin.clone(),
        }
    }
}

impl ConfigurationSnapshot {
    /// Replace the snapshot's consumers with those declared in the store.
    ///
    /// Resources are indexed by `(namespace, name)`, so a resource listed twice
    /// keeps its last version. A credential that cannot be resolved is skipped
    /// on its own; the consumer is still materialized.
    pub fn fill_consumers_and_credentials(&mut self, store: &dyn Storer) {
        let mut index: BTreeMap<ResourceKey, Consumer> = BTreeMap::new();

        for resource in store.list_consumers() {
            let key = resource.key();
            let Some(mut consumer) = Consumer::from_resource(&resource) else {
                debug!(consumer = %key, "skipping consumer with no username or custom_id");
                continue;
            };

            for secret_name in &resource.credentials {
                let secret = match store.get_secret(&key.namespace, secret_name) {
                    Ok(secret) => secret,
                    Err(e) => {
                        error!(consumer = %key, secret = %secret_name, error = %e, "failed to fetch secret");
                        continue;
                    }
                };
                match Credential::from_secret(&secret) {
                    Ok(credential) => consumer.credentials.push(credential),
                    Err(e) => {
                        error!(consumer = %key, secret = %secret_name, error = %e, "failed to provision credential");
                    }
                }
            }

            index.insert(key, consumer);
        }

        self.consumers = index.into_values().collect();
    }
}

#[cfg(test)]
mod tests {
    use gwconf_core::{ObjectMeta, Secret};
    use gwconf_store::MemoryStore;
    use tracing_test::traced_test;

    use super::*;
    use crate::credential::{CredentialKind, KeyAuth};

    fn consumer(name: &str, username: &str, custom_id: &str, secrets: &[&str]) -> ConsumerResource {
        ConsumerResource {
            meta: ObjectMeta::new("default", name),
            username: username.into(),
            custom_id: custom_id.into(),
            credentials: secrets.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn secret(name: &str, pairs: &[(&str, &str)]) -> Secret {
        Secret::from_strings(ObjectMeta::new("default", name), pairs.iter().copied())
    }

    #[test]
    fn consumer_without_identity_is_not_materialized() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("ghost", "", "", &[]));
        store.add_consumer(consumer("by-id", "", "id-7", &[]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        assert_eq!(snapshot.consumers.len(), 1);
        assert_eq!(snapshot.consumers[0].custom_id.as_deref(), Some("id-7"));
        assert_eq!(snapshot.consumers[0].identifier(), Some("id-7"));
    }

    #[test]
    #[traced_test]
    fn missing_secret_skips_only_that_credential() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("alice", "alice", "", &["gone", "alice-key"]));
        store.add_secret(secret("alice-key", &[("kongCredType", "key-auth"), ("key", "k1")]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        assert_eq!(snapshot.consumers.len(), 1);
        assert_eq!(
            snapshot.consumers[0].credentials,
            vec![Credential::KeyAuth(KeyAuth { key: "k1".into() })]
        );
        assert!(logs_contain("failed to fetch secret"));
    }

    #[test]
    #[traced_test]
    fn consumer_with_no_resolvable_secret_has_no_credentials() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("dave", "dave", "", &["gone-1", "gone-2"]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        assert_eq!(snapshot.consumers.len(), 1);
        assert_eq!(snapshot.consumers[0].username.as_deref(), Some("dave"));
        assert!(snapshot.consumers[0].credentials.is_empty());
        assert!(logs_contain("gone-2"));
    }

    #[test]
    #[traced_test]
    fn non_utf8_secret_is_skipped_with_error() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("erin", "erin", "", &["binary", "ok"]));
        let mut binary = secret("binary", &[("kongCredType", "key-auth")]);
        binary.data.insert("key".into(), vec![0x61, 0xff, 0xfe, 0x62]);
        store.add_secret(binary);
        store.add_secret(secret("ok", &[("kongCredType", "key-auth"), ("key", "k2")]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        assert_eq!(
            snapshot.consumers[0].credentials,
            vec![Credential::KeyAuth(KeyAuth { key: "k2".into() })]
        );
        assert!(logs_contain("failed to provision credential"));
        assert!(logs_contain("not valid UTF-8"));
    }

    #[test]
    fn invalid_credentials_are_dropped() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("bob", "bob", "", &["unsupported", "empty", "malformed", "good"]));
        store.add_secret(secret("unsupported", &[("kongCredType", "ldap-auth"), ("user", "x")]));
        store.add_secret(secret("empty", &[("kongCredType", "acl")]));
        store.add_secret(secret("malformed", &[("kongCredType", "basic-auth"), ("username", "bob")]));
        store.add_secret(secret("good", &[("kongCredType", "acl"), ("group", "ops")]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        let creds = &snapshot.consumers[0].credentials;
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].kind(), CredentialKind::Acl);
    }

    #[test]
    fn duplicate_resource_collapses_last_write_wins() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("alice", "alice", "", &[]));
        store.add_consumer(consumer("alice", "alice-renamed", "", &[]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        assert_eq!(snapshot.consumers.len(), 1);
        assert_eq!(snapshot.consumers[0].username.as_deref(), Some("alice-renamed"));
    }

    #[test]
    fn rerunning_the_pass_replaces_consumers() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("alice", "alice", "", &[]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);
        snapshot.fill_consumers_and_credentials(&store);

        assert_eq!(snapshot.consumers.len(), 1);
    }

    #[test]
    fn credentials_keep_declaration_order() {
        let mut store = MemoryStore::new();
        store.add_consumer(consumer("carol", "carol", "", &["z-acl", "a-key"]));
        store.add_secret(secret("z-acl", &[("kongCredType", "acl"), ("group", "g")]));
        store.add_secret(secret("a-key", &[("kongCredType", "key-auth"), ("key", "k")]));

        let mut snapshot = ConfigurationSnapshot::default();
        snapshot.fill_consumers_and_credentials(&store);

        let kinds: Vec<_> = snapshot.consumers[0].credentials.iter().map(Credential::kind).collect();
        assert_eq!(kinds, vec![CredentialKind::Acl, CredentialKind::KeyAuth]);
    }
}
