// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Well-known annotation keys and pure readers over annotation maps.

use std::collections::BTreeMap;

pub const PLUGINS_KEY: &str = "konghq.com/plugins";
pub const OVERRIDE_KEY: &str = "konghq.com/override";

pub const PROTOCOL_KEY: &str = "konghq.com/protocol";
pub const PATH_KEY: &str = "konghq.com/path";
pub const RETRIES_KEY: &str = "konghq.com/retries";
pub const CONNECT_TIMEOUT_KEY: &str = "konghq.com/connect-timeout";
pub const READ_TIMEOUT_KEY: &str = "konghq.com/read-timeout";
pub const WRITE_TIMEOUT_KEY: &str = "konghq.com/write-timeout";

pub const METHODS_KEY: &str = "konghq.com/methods";
pub const PROTOCOLS_KEY: &str = "konghq.com/protocols";
pub const STRIP_PATH_KEY: &str = "konghq.com/strip-path";
pub const PRESERVE_HOST_KEY: &str = "konghq.com/preserve-host";
pub const REGEX_PRIORITY_KEY: &str = "konghq.com/regex-priority";
pub const HTTPS_REDIRECT_STATUS_CODE_KEY: &str = "konghq.com/https-redirect-status-code";

pub const HOST_HEADER_KEY: &str = "konghq.com/host-header";

/// Extract plugin declaration names from the plugins annotation.
///
/// Splits on commas, trims whitespace and drops blank entries. Order and
/// duplicates are preserved.
pub fn extract_plugin_names(annotations: &BTreeMap<String, String>) -> Vec<String> {
    extract_list(annotations, PLUGINS_KEY)
}

/// Extract the name of the override resource an object points at.
pub fn extract_override_name(annotations: &BTreeMap<String, String>) -> Option<&str> {
    annotations
        .get(OVERRIDE_KEY)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Read a comma-separated annotation value as a list.
pub fn extract_list(annotations: &BTreeMap<String, String>, key: &str) -> Vec<String> {
    annotations
        .get(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
