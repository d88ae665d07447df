// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Layers, lowest precedence first: compiled defaults, the files returned by
//! [`config_paths`], then `GWCONF_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::model::GwconfConfig;

/// Top-level tables; env keys are split after these prefixes only.
const SECTIONS: [&str; 3] = ["assembler", "input", "output"];

/// Candidate configuration files, lowest precedence first.
///
/// Missing files are skipped by Figment.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/gwconf/gwconf.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("gwconf").join("gwconf.toml"));
    }
    paths.push(PathBuf::from("gwconf.toml"));
    paths
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(GwconfConfig::default()))
}

/// Figment for the standard file hierarchy plus environment.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

pub fn load_config() -> Result<GwconfConfig, figment::Error> {
    build_figment().extract()
}

/// Load from TOML text alone; neither files nor environment are consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<GwconfConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load from one explicit file, still honoring environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<GwconfConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `GWCONF_ASSEMBLER_LOG_LEVEL` maps to `assembler.log_level`.
///
/// `Env::split("_")` would also split inside key names, so only the section
/// prefix is turned into a dot.
fn env_provider() -> Env {
    Env::prefixed("GWCONF_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key)
            .into()
    })
}
