// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin relation indexing.
//!
//! Every object carrying a `konghq.com/plugins` annotation contributes the
//! gateway entity derived from it to the relations of each plugin it names.
//! Relations are keyed by `(object namespace, plugin declaration name)`.

use std::collections::BTreeMap;

use gwconf_core::{ObjectMeta, ResourceKey, extract_plugin_names};

use crate::snapshot::ConfigurationSnapshot;

/// Targets of one plugin declaration, partitioned by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignRelations {
    pub services: Vec<String>,
    pub routes: Vec<String>,
    pub consumers: Vec<String>,
}

/// One emitted attachment of a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Binding {
    pub service: Option<String>,
    pub route: Option<String>,
    pub consumer: Option<String>,
}

impl ForeignRelations {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.routes.is_empty() && self.consumers.is_empty()
    }

    /// Bindings to emit for these relations.
    ///
    /// Consumers are paired with every service and every route; consumers
    /// alone get one binding each; without consumers each service and each
    /// route is bound on its own. Services are never paired with routes.
    pub fn combinations(&self) -> Vec<Binding> {
        let mut bindings = Vec::new();

        if self.consumers.is_empty() {
            bindings.extend(self.services.iter().map(|s| Binding {
                service: Some(s.clone()),
                ..Default::default()
            }));
            bindings.extend(self.routes.iter().map(|r| Binding {
                route: Some(r.clone()),
                ..Default::default()
            }));
            return bindings;
        }

        if self.services.is_empty() && self.routes.is_empty() {
            bindings.extend(self.consumers.iter().map(|c| Binding {
                consumer: Some(c.clone()),
                ..Default::default()
            }));
            return bindings;
        }

        for consumer in &self.consumers {
            bindings.extend(self.services.iter().map(|s| Binding {
                service: Some(s.clone()),
                consumer: Some(consumer.clone()),
                ..Default::default()
            }));
            bindings.extend(self.routes.iter().map(|r| Binding {
                route: Some(r.clone()),
                consumer: Some(consumer.clone()),
                ..Default::default()
            }));
        }
        bindings
    }
}

/// Relations for every referenced plugin declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginRelations(BTreeMap<ResourceKey, ForeignRelations>);

impl PluginRelations {
    fn entry(&mut self, meta: &ObjectMeta, plugin: String) -> &mut ForeignRelations {
        self.0
            .entry(ResourceKey::new(meta.namespace.clone(), plugin))
            .or_default()
    }

    /// Record that `meta`'s service named `name` uses each annotated plugin.
    pub fn add_service(&mut self, meta: &ObjectMeta, name: &str) {
        for plugin in extract_plugin_names(&meta.annotations) {
            self.entry(meta, plugin).services.push(name.to_string());
        }
    }

    pub fn add_route(&mut self, meta: &ObjectMeta, name: &str) {
        for plugin in extract_plugin_names(&meta.annotations) {
            self.entry(meta, plugin).routes.push(name.to_string());
        }
    }

    pub fn add_consumer(&mut self, meta: &ObjectMeta, identifier: &str) {
        for plugin in extract_plugin_names(&meta.annotations) {
            self.entry(meta, plugin).consumers.push(identifier.to_string());
        }
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&ForeignRelations> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &ForeignRelations)> {
        self.0.iter()
    }
}

impl ConfigurationSnapshot {
    /// Index plugin annotations across services, routes and consumers.
    pub fn plugin_relations(&self) -> PluginRelations {
        let mut relations = PluginRelations::default();

        for service in &self.services {
            for backing in &service.backing_services {
                relations.add_service(backing, &service.name);
            }
            for route in &service.routes {
                relations.add_route(&route.origin, &route.name);
            }
        }

        for consumer in &self.consumers {
            if let Some(identifier) = consumer.identifier() {
                relations.add_consumer(&consumer.origin.meta, identifier);
            }
        }

        relations
    }
}

#[cfg(test)]
mod tests {
    use gwconf_core::ConsumerResource;
    use gwconf_core::annotations::PLUGINS_KEY;

    use super::*;
    use crate::consumer::Consumer;
    use crate::entities::{Route, Service};

    fn relations(services: &[&str], routes: &[&str], consumers: &[&str]) -> ForeignRelations {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        ForeignRelations {
            services: owned(services),
            routes: owned(routes),
            consumers: owned(consumers),
        }
    }

    fn binding(service: Option<&str>, route: Option<&str>, consumer: Option<&str>) -> Binding {
        Binding {
            service: service.map(Into::into),
            route: route.map(Into::into),
            consumer: consumer.map(Into::into),
        }
    }

    #[test]
    fn services_and_routes_are_bound_separately() {
        let got = relations(&["s1"], &["r1", "r2"], &[]).combinations();
        assert_eq!(
            got,
            vec![
                binding(Some("s1"), None, None),
                binding(None, Some("r1"), None),
                binding(None, Some("r2"), None),
            ]
        );
    }

    #[test]
    fn consumers_alone_get_one_binding_each() {
        let got = relations(&[], &[], &["alice", "bob"]).combinations();
        assert_eq!(
            got,
            vec![binding(None, None, Some("alice")), binding(None, None, Some("bob"))]
        );
    }

    #[test]
    fn consumers_pair_with_services_and_routes() {
        let got = relations(&["s1"], &["r1"], &["alice", "bob"]).combinations();
        assert_eq!(got.len(), 4);
        assert!(got.contains(&binding(Some("s1"), None, Some("alice"))));
        assert!(got.contains(&binding(None, Some("r1"), Some("bob"))));
        assert!(got.iter().all(|b| !(b.service.is_some() && b.route.is_some())));
    }

    #[test]
    fn empty_relations_produce_nothing() {
        assert!(ForeignRelations::default().combinations().is_empty());
    }

    #[test]
    fn snapshot_relations_are_keyed_by_namespace_and_plugin() {
        let annotated = |ns: &str, name: &str, plugins: &str| {
            ObjectMeta::new(ns, name).with_annotation(PLUGINS_KEY, plugins)
        };

        let mut svc = Service::new("default.echo.80", "echo.default.svc");
        svc.backing_services = vec![annotated("default", "echo", "rl, cors")];
        svc.routes = vec![
            Route::new("default.ing.00", annotated("default", "ing", "rl")),
            Route::new("other.ing.00", annotated("other", "ing", "rl")),
        ];
        let consumer = Consumer::from_resource(&ConsumerResource {
            meta: annotated("default", "alice", "rl"),
            username: "alice".into(),
            ..Default::default()
        })
        .unwrap();

        let snapshot = ConfigurationSnapshot {
            services: vec![svc],
            consumers: vec![consumer],
            ..Default::default()
        };
        let relations = snapshot.plugin_relations();

        assert_eq!(relations.len(), 3);
        let rl = relations.get(&ResourceKey::new("default", "rl")).unwrap();
        assert_eq!(rl.services, vec!["default.echo.80"]);
        assert_eq!(rl.routes, vec!["default.ing.00"]);
        assert_eq!(rl.consumers, vec!["alice"]);
        let other = relations.get(&ResourceKey::new("other", "rl")).unwrap();
        assert_eq!(other.routes, vec!["other.ing.00"]);
        assert!(relations.get(&ResourceKey::new("default", "cors")).is_some());
    }

    #[test]
    fn duplicate_annotation_entries_are_tolerated() {
        let mut relations = PluginRelations::default();
        let meta = ObjectMeta::new("default", "ing").with_annotation(PLUGINS_KEY, "rl,rl");
        relations.add_route(&meta, "r1");
        let rl = relations.get(&ResourceKey::new("default", "rl")).unwrap();
        assert_eq!(rl.routes, vec!["r1", "r1"]);
    }
}
