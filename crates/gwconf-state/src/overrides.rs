// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Override merging for services, routes and upstreams.
//!
//! An override resource is applied over an entity's synthesized defaults,
//! then the entity's own annotations are applied on top, so annotations
//! always win. Every step is a plain assignment, which makes the merge
//! idempotent.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use gwconf_core::annotations::{
    self, CONNECT_TIMEOUT_KEY, HOST_HEADER_KEY, HTTPS_REDIRECT_STATUS_CODE_KEY, METHODS_KEY,
    PATH_KEY, PRESERVE_HOST_KEY, PROTOCOLS_KEY, PROTOCOL_KEY, READ_TIMEOUT_KEY, REGEX_PRIORITY_KEY,
    RETRIES_KEY, STRIP_PATH_KEY, WRITE_TIMEOUT_KEY,
};
use gwconf_core::{ObjectMeta, OverrideResource, ResourceKey, StoreError, Storer};
use tracing::{debug, error, warn};

use crate::entities::{Route, Service, Upstream};
use crate::snapshot::ConfigurationSnapshot;

type Annotations = BTreeMap<String, String>;

/// Parse an annotation value, logging and ignoring malformed ones.
fn parse_annotation<T: FromStr>(annotations: &Annotations, key: &str) -> Option<T> {
    let raw = annotations.get(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(annotation = key, value = %raw, "ignoring malformed annotation value");
            None
        }
    }
}

/// Upper-case HTTP methods; `None` if any entry is not a plain token.
fn normalize_methods<'a>(methods: impl IntoIterator<Item = &'a str>) -> Option<Vec<String>> {
    methods
        .into_iter()
        .map(|m| {
            let m = m.trim().to_ascii_uppercase();
            (!m.is_empty() && m.chars().all(|c| c.is_ascii_uppercase())).then_some(m)
        })
        .collect()
}

impl Service {
    /// Apply the override's `proxy` section, then this service's annotations.
    pub fn apply_override(&mut self, resource: Option<&OverrideResource>, annotations: &Annotations) {
        if let Some(proxy) = resource.and_then(|r| r.proxy.as_ref()) {
            if let Some(protocol) = &proxy.protocol {
                self.protocol = protocol.clone();
            }
            if let Some(path) = &proxy.path {
                self.path = Some(path.clone());
            }
            if let Some(retries) = proxy.retries {
                self.retries = Some(retries);
            }
            if let Some(t) = proxy.connect_timeout {
                self.connect_timeout = Some(t);
            }
            if let Some(t) = proxy.read_timeout {
                self.read_timeout = Some(t);
            }
            if let Some(t) = proxy.write_timeout {
                self.write_timeout = Some(t);
            }
        }
        self.apply_annotations(annotations);

        // gRPC services do not route by path.
        if matches!(self.protocol.as_str(), "grpc" | "grpcs") {
            self.path = None;
        }
    }

    fn apply_annotations(&mut self, annotations: &Annotations) {
        if let Some(protocol) = annotations.get(PROTOCOL_KEY).map(|p| p.trim()).filter(|p| !p.is_empty()) {
            self.protocol = protocol.to_string();
        }
        if let Some(path) = annotations.get(PATH_KEY) {
            if path.starts_with('/') {
                self.path = Some(path.clone());
            } else {
                warn!(annotation = PATH_KEY, value = %path, "ignoring path annotation not starting with '/'");
            }
        }
        if let Some(v) = parse_annotation(annotations, RETRIES_KEY) {
            self.retries = Some(v);
        }
        if let Some(v) = parse_annotation(annotations, CONNECT_TIMEOUT_KEY) {
            self.connect_timeout = Some(v);
        }
        if let Some(v) = parse_annotation(annotations, READ_TIMEOUT_KEY) {
            self.read_timeout = Some(v);
        }
        if let Some(v) = parse_annotation(annotations, WRITE_TIMEOUT_KEY) {
            self.write_timeout = Some(v);
        }
    }
}

impl Route {
    /// Apply the override's `route` section, then the origin's annotations.
    pub fn apply_override(&mut self, resource: Option<&OverrideResource>) {
        if let Some(route) = resource.and_then(|r| r.route.as_ref()) {
            if let Some(methods) = &route.methods {
                match normalize_methods(methods.iter().map(String::as_str)) {
                    Some(methods) => self.methods = methods,
                    None => warn!(route = %self.name, "ignoring override with invalid HTTP methods"),
                }
            }
            if let Some(headers) = &route.headers {
                self.headers = headers.clone();
            }
            if let Some(protocols) = &route.protocols {
                self.protocols = protocols.clone();
            }
            if let Some(v) = route.regex_priority {
                self.regex_priority = Some(v);
            }
            if let Some(v) = route.strip_path {
                self.strip_path = Some(v);
            }
            if let Some(v) = route.preserve_host {
                self.preserve_host = Some(v);
            }
            if let Some(v) = route.https_redirect_status_code {
                self.https_redirect_status_code = Some(v);
            }
            if let Some(v) = &route.path_handling {
                self.path_handling = Some(v.clone());
            }
            if let Some(v) = route.request_buffering {
                self.request_buffering = Some(v);
            }
            if let Some(v) = route.response_buffering {
                self.response_buffering = Some(v);
            }
        }
        let annotations = self.origin.annotations.clone();
        self.apply_annotations(&annotations);
    }

    fn apply_annotations(&mut self, annotations: &Annotations) {
        if annotations.contains_key(METHODS_KEY) {
            let listed = annotations::extract_list(annotations, METHODS_KEY);
            match normalize_methods(listed.iter().map(String::as_str)) {
                Some(methods) => self.methods = methods,
                None => warn!(route = %self.name, annotation = METHODS_KEY, "ignoring invalid HTTP methods"),
            }
        }
        if annotations.contains_key(PROTOCOLS_KEY) {
            let protocols = annotations::extract_list(annotations, PROTOCOLS_KEY);
            if !protocols.is_empty() {
                self.protocols = protocols;
            }
        }
        if let Some(v) = parse_annotation(annotations, STRIP_PATH_KEY) {
            self.strip_path = Some(v);
        }
        if let Some(v) = parse_annotation(annotations, PRESERVE_HOST_KEY) {
            self.preserve_host = Some(v);
        }
        if let Some(v) = parse_annotation(annotations, REGEX_PRIORITY_KEY) {
            self.regex_priority = Some(v);
        }
        if let Some(v) = parse_annotation(annotations, HTTPS_REDIRECT_STATUS_CODE_KEY) {
            self.https_redirect_status_code = Some(v);
        }
    }
}

impl Upstream {
    /// Apply the override's `upstream` section, then the backing services' annotations.
    pub fn apply_override(&mut self, resource: Option<&OverrideResource>, annotations: &Annotations) {
        if let Some(upstream) = resource.and_then(|r| r.upstream.as_ref()) {
            if let Some(v) = &upstream.algorithm {
                self.algorithm = Some(v.clone());
            }
            if let Some(v) = upstream.slots {
                self.slots = Some(v);
            }
            if let Some(v) = &upstream.hash_on {
                self.hash_on = Some(v.clone());
            }
            if let Some(v) = &upstream.hash_fallback {
                self.hash_fallback = Some(v.clone());
            }
            if let Some(v) = &upstream.hash_on_header {
                self.hash_on_header = Some(v.clone());
            }
            if let Some(v) = &upstream.host_header {
                self.host_header = Some(v.clone());
            }
            if let Some(v) = &upstream.healthchecks {
                self.healthchecks = Some(v.clone());
            }
        }
        if let Some(host) = annotations.get(HOST_HEADER_KEY).map(|h| h.trim()).filter(|h| !h.is_empty()) {
            self.host_header = Some(host.to_string());
        }
    }
}

/// Override lookups memoized by owner set for one pass.
struct OverrideCache<'s> {
    store: &'s dyn Storer,
    resolved: HashMap<Vec<ResourceKey>, Result<Option<OverrideResource>, StoreError>>,
}

impl<'s> OverrideCache<'s> {
    fn new(store: &'s dyn Storer) -> Self {
        Self {
            store,
            resolved: HashMap::new(),
        }
    }

    /// Look up the override for `owners`, logging a failure the first time it happens.
    fn lookup(&mut self, owners: &[ObjectMeta]) -> Result<Option<&OverrideResource>, &StoreError> {
        let key: Vec<ResourceKey> = owners.iter().map(ObjectMeta::key).collect();
        let store = self.store;
        let entry = self.resolved.entry(key).or_insert_with_key(|key| {
            let refs: Vec<&ObjectMeta> = owners.iter().collect();
            let result = store.get_override_for(&refs);
            if let Err(e) = &result {
                let owners: Vec<String> = key.iter().map(ToString::to_string).collect();
                error!(owners = ?owners, error = %e, "failed to fetch override resource");
            }
            result
        });
        entry.as_ref().map(Option::as_ref)
    }
}

/// Merge the annotations of several objects; later objects win on conflicts.
fn merged_annotations(objects: &[ObjectMeta]) -> Annotations {
    objects
        .iter()
        .flat_map(|o| o.annotations.iter().map(|(k, v)| (k.clone(), v.clone())))
        .collect()
}

impl ConfigurationSnapshot {
    /// Apply override resources to every service, route and upstream.
    ///
    /// A failed lookup leaves that entity's defaults untouched. Routes are
    /// resolved independently of, and after, their owning service.
    pub fn fill_overrides(&mut self, store: &dyn Storer) {
        let mut cache = OverrideCache::new(store);

        for service in &mut self.services {
            match cache.lookup(&service.backing_services) {
                Ok(resource) => {
                    let resource = resource.cloned();
                    let annotations = merged_annotations(&service.backing_services);
                    service.apply_override(resource.as_ref(), &annotations);
                }
                Err(_) => debug!(service = %service.name, "leaving service defaults untouched"),
            }

            for route in &mut service.routes {
                match cache.lookup(std::slice::from_ref(&route.origin)) {
                    Ok(resource) => {
                        let resource = resource.cloned();
                        route.apply_override(resource.as_ref());
                    }
                    Err(_) => debug!(route = %route.name, "leaving route defaults untouched"),
                }
            }
        }

        for upstream in &mut self.upstreams {
            match cache.lookup(&upstream.backing_services) {
                Ok(resource) => {
                    let resource = resource.cloned();
                    let annotations = merged_annotations(&upstream.backing_services);
                    upstream.apply_override(resource.as_ref(), &annotations);
                }
                Err(_) => debug!(upstream = %upstream.name, "leaving upstream defaults untouched"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use gwconf_core::annotations::OVERRIDE_KEY;
    use gwconf_core::{ConsumerResource, PluginDeclaration, ProxyOverride, RouteOverride, Secret, UpstreamOverride};
    use gwconf_store::MemoryStore;

    use super::*;

    fn proxy_override(retries: u32, path: &str) -> OverrideResource {
        OverrideResource {
            meta: ObjectMeta::new("default", "tuned"),
            proxy: Some(ProxyOverride {
                retries: Some(retries),
                path: Some(path.into()),
                read_timeout: Some(1000),
                ..Default::default()
            }),
            route: Some(RouteOverride {
                methods: Some(vec!["get".into(), "post".into()]),
                strip_path: Some(false),
                ..Default::default()
            }),
            upstream: Some(UpstreamOverride {
                algorithm: Some("least-connections".into()),
                host_header: Some("from-override".into()),
                ..Default::default()
            }),
        }
    }

    fn backing(annotations: &[(&str, &str)]) -> ObjectMeta {
        annotations
            .iter()
            .fold(ObjectMeta::new("default", "echo"), |m, (k, v)| m.with_annotation(*k, *v))
    }

    #[test]
    fn override_fields_replace_defaults() {
        let mut svc = Service::new("echo", "echo.default.svc");
        svc.retries = Some(5);
        svc.apply_override(Some(&proxy_override(2, "/v1")), &Annotations::new());
        assert_eq!(svc.retries, Some(2));
        assert_eq!(svc.path.as_deref(), Some("/v1"));
        assert_eq!(svc.read_timeout, Some(1000));
        assert!(svc.connect_timeout.is_none());
    }

    #[test]
    fn annotations_win_over_override() {
        let mut svc = Service::new("echo", "echo.default.svc");
        let annotations = backing(&[(RETRIES_KEY, "9"), (PATH_KEY, "/annotated")]).annotations;
        svc.apply_override(Some(&proxy_override(2, "/v1")), &annotations);
        assert_eq!(svc.retries, Some(9));
        assert_eq!(svc.path.as_deref(), Some("/annotated"));
    }

    #[test]
    fn malformed_annotation_is_ignored() {
        let mut svc = Service::new("echo", "echo.default.svc");
        let annotations = backing(&[(RETRIES_KEY, "many"), (PATH_KEY, "relative")]).annotations;
        svc.apply_override(Some(&proxy_override(2, "/v1")), &annotations);
        assert_eq!(svc.retries, Some(2));
        assert_eq!(svc.path.as_deref(), Some("/v1"));
    }

    #[test]
    fn grpc_service_drops_path() {
        let mut svc = Service::new("echo", "echo.default.svc");
        let annotations = backing(&[(PROTOCOL_KEY, "grpc")]).annotations;
        svc.apply_override(Some(&proxy_override(2, "/v1")), &annotations);
        assert_eq!(svc.protocol, "grpc");
        assert!(svc.path.is_none());
    }

    #[test]
    fn service_override_is_idempotent() {
        let resource = proxy_override(3, "/x");
        let annotations = backing(&[(CONNECT_TIMEOUT_KEY, "250")]).annotations;

        let mut once = Service::new("echo", "echo.default.svc");
        once.apply_override(Some(&resource), &annotations);
        let mut twice = once.clone();
        twice.apply_override(Some(&resource), &annotations);

        assert_eq!(once, twice);
    }

    #[test]
    fn route_methods_are_upper_cased_and_annotations_win() {
        let origin = ObjectMeta::new("default", "ing").with_annotation(STRIP_PATH_KEY, "true");
        let mut route = Route::new("ing.echo.00", origin);
        route.apply_override(Some(&proxy_override(1, "/")));
        assert_eq!(route.methods, vec!["GET", "POST"]);
        assert_eq!(route.strip_path, Some(true));
    }

    #[test]
    fn invalid_route_methods_are_rejected_as_a_whole() {
        let origin = ObjectMeta::new("default", "ing").with_annotation(METHODS_KEY, "GET,P@ST");
        let mut route = Route::new("r", origin);
        route.methods = vec!["PUT".into()];
        route.apply_override(None);
        assert_eq!(route.methods, vec!["PUT"]);
    }

    #[test]
    fn upstream_host_header_annotation_wins() {
        let mut upstream = Upstream::new("echo.default.80.svc");
        let annotations = backing(&[(HOST_HEADER_KEY, "internal.example")]).annotations;
        upstream.apply_override(Some(&proxy_override(1, "/")), &annotations);
        assert_eq!(upstream.algorithm.as_deref(), Some("least-connections"));
        assert_eq!(upstream.host_header.as_deref(), Some("internal.example"));
    }

    #[test]
    fn fill_overrides_applies_to_services_routes_and_upstreams() {
        let mut store = MemoryStore::new();
        store.add_override(proxy_override(4, "/api"));

        let owner = backing(&[(OVERRIDE_KEY, "tuned")]);
        let mut svc = Service::new("echo", "echo.default.svc");
        svc.backing_services = vec![owner.clone()];
        svc.routes = vec![Route::new(
            "ing.echo",
            ObjectMeta::new("default", "ing").with_annotation(OVERRIDE_KEY, "tuned"),
        )];
        let mut upstream = Upstream::new("echo.default.80.svc");
        upstream.backing_services = vec![owner];

        let mut snapshot = ConfigurationSnapshot {
            services: vec![svc],
            upstreams: vec![upstream],
            ..Default::default()
        };
        snapshot.fill_overrides(&store);

        assert_eq!(snapshot.services[0].retries, Some(4));
        assert_eq!(snapshot.services[0].routes[0].methods, vec!["GET", "POST"]);
        assert_eq!(snapshot.upstreams[0].algorithm.as_deref(), Some("least-connections"));
    }

    #[test]
    fn failed_lookup_leaves_defaults_but_routes_still_resolve() {
        let mut store = MemoryStore::new();
        store.add_override(proxy_override(4, "/api"));

        let mut svc = Service::new("echo", "echo.default.svc");
        svc.retries = Some(1);
        svc.backing_services = vec![
            backing(&[(OVERRIDE_KEY, "missing"), (RETRIES_KEY, "7")]),
        ];
        svc.routes = vec![Route::new(
            "ing.echo",
            ObjectMeta::new("default", "ing").with_annotation(OVERRIDE_KEY, "tuned"),
        )];

        let mut snapshot = ConfigurationSnapshot {
            services: vec![svc],
            ..Default::default()
        };
        snapshot.fill_overrides(&store);

        assert_eq!(snapshot.services[0].retries, Some(1));
        assert_eq!(snapshot.services[0].routes[0].strip_path, Some(false));
    }

    /// Store wrapper counting override lookups.
    struct CountingStore {
        inner: MemoryStore,
        lookups: Cell<usize>,
    }

    impl Storer for CountingStore {
        fn list_consumers(&self) -> Vec<ConsumerResource> {
            self.inner.list_consumers()
        }
        fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, StoreError> {
            self.inner.get_secret(namespace, name)
        }
        fn get_override_for(&self, owners: &[&ObjectMeta]) -> Result<Option<OverrideResource>, StoreError> {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.get_override_for(owners)
        }
        fn get_plugin(&self, namespace: &str, name: &str) -> Result<PluginDeclaration, StoreError> {
            self.inner.get_plugin(namespace, name)
        }
        fn list_cluster_plugins(&self) -> Result<Vec<PluginDeclaration>, StoreError> {
            self.inner.list_cluster_plugins()
        }
        fn list_legacy_global_plugins(&self) -> Result<Vec<PluginDeclaration>, StoreError> {
            self.inner.list_legacy_global_plugins()
        }
    }

    #[test]
    fn shared_owners_resolve_once() {
        let mut inner = MemoryStore::new();
        inner.add_override(proxy_override(4, "/api"));
        let store = CountingStore {
            inner,
            lookups: Cell::new(0),
        };

        let owner = backing(&[(OVERRIDE_KEY, "tuned")]);
        let mut svc = Service::new("echo", "echo.default.svc");
        svc.backing_services = vec![owner.clone()];
        let mut upstream = Upstream::new("echo.default.80.svc");
        upstream.backing_services = vec![owner];

        let mut snapshot = ConfigurationSnapshot {
            services: vec![svc],
            upstreams: vec![upstream],
            ..Default::default()
        };
        snapshot.fill_overrides(&store);

        assert_eq!(store.lookups.get(), 1);
        assert_eq!(snapshot.upstreams[0].host_header.as_deref(), Some("from-override"));
    }

    #[test]
    fn fill_overrides_twice_is_idempotent() {
        let mut store = MemoryStore::new();
        store.add_override(proxy_override(4, "/api"));
        let mut svc = Service::new("echo", "echo.default.svc");
        svc.backing_services = vec![backing(&[(OVERRIDE_KEY, "tuned"), (WRITE_TIMEOUT_KEY, "60")])];

        let mut snapshot = ConfigurationSnapshot {
            services: vec![svc],
            ..Default::default()
        };
        snapshot.fill_overrides(&store);
        let once = snapshot.clone();
        snapshot.fill_overrides(&store);

        assert_eq!(snapshot, once);
    }
}
