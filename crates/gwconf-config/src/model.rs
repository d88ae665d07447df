// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the gwconf assembler.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level gwconf configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GwconfConfig {
    /// Assembly behavior.
    #[serde(default)]
    pub assembler: AssemblerConfig,

    /// Where resources are read from.
    #[serde(default)]
    pub input: InputConfig,

    /// How the snapshot is written.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Assembly behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Gateway version stamped onto the snapshot. Must be valid semver.
    #[serde(default = "default_gateway_version")]
    pub gateway_version: String,

    /// Warn when legacy namespaced global plugins are found.
    #[serde(default = "default_true")]
    pub warn_legacy_globals: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            gateway_version: default_gateway_version(),
            warn_legacy_globals: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gateway_version() -> String {
    "3.4.0".to_string()
}

fn default_true() -> bool {
    true
}

/// Resource input configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Path of the JSON resource document. `None` requires `--input`.
    #[serde(default)]
    pub path: Option<String>,
}

/// Snapshot output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Redact credential and certificate secrets before printing.
    #[serde(default = "default_true")]
    pub sanitize: bool,

    /// Pretty-print the JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sanitize: true,
            pretty: true,
        }
    }
}
