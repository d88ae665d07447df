// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture builders for cluster resources and translated entities.

use gwconf_core::annotations::PLUGINS_KEY;
use gwconf_core::{ConsumerResource, ObjectMeta, PluginDeclaration, Secret};
use gwconf_state::credential::CREDENTIAL_TYPE_KEY;
use gwconf_state::{Route, Service};
use serde_json::Value;

/// Object metadata carrying a plugins annotation.
pub fn annotated(namespace: &str, name: &str, plugins: &str) -> ObjectMeta {
    ObjectMeta::new(namespace, name).with_annotation(PLUGINS_KEY, plugins)
}

/// A consumer declaration referencing credential secrets by name.
pub fn consumer(meta: ObjectMeta, username: &str, custom_id: &str, secrets: &[&str]) -> ConsumerResource {
    ConsumerResource {
        meta,
        username: username.to_string(),
        custom_id: custom_id.to_string(),
        credentials: secrets.iter().map(|s| s.to_string()).collect(),
    }
}

/// A credential secret of `kind` with the given string fields.
pub fn credential_secret(namespace: &str, name: &str, kind: &str, fields: &[(&str, &str)]) -> Secret {
    let entries = std::iter::once((CREDENTIAL_TYPE_KEY, kind)).chain(fields.iter().copied());
    Secret::from_strings(ObjectMeta::new(namespace, name), entries)
}

/// A namespaced plugin declaration with an inline configuration.
pub fn plugin(namespace: &str, name: &str, plugin_name: &str, config: Value) -> PluginDeclaration {
    PluginDeclaration {
        meta: ObjectMeta::new(namespace, name),
        plugin_name: plugin_name.to_string(),
        config: Some(config),
        ..Default::default()
    }
}

/// A cluster-scoped plugin declaration without configuration.
pub fn cluster_plugin(name: &str, plugin_name: &str) -> PluginDeclaration {
    PluginDeclaration {
        meta: ObjectMeta::new("", name),
        plugin_name: plugin_name.to_string(),
        ..Default::default()
    }
}

/// A service backed by `backing`, with one route per origin object.
///
/// Routes are named `<origin namespace>.<origin name>.<index>`.
pub fn service(name: &str, backing: ObjectMeta, route_origins: Vec<ObjectMeta>) -> Service {
    let mut svc = Service::new(name, format!("{}.{}.svc", backing.name, backing.namespace));
    svc.routes = route_origins
        .into_iter()
        .enumerate()
        .map(|(i, origin)| Route::new(format!("{}.{}.{i:02}", origin.namespace, origin.name), origin))
        .collect();
    svc.backing_services = vec![backing];
    svc
}
