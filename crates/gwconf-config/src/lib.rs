// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the gwconf assembler.
//!
//! `gwconf.toml` has three tables: `[assembler]`, `[input]` and `[output]`.
//! Unknown keys are rejected, and every failure is reported as a
//! [`ConfigError`] diagnostic pointing into the offending file.
//!
//! ```no_run
//! let config = gwconf_config::load_and_validate().expect("config errors");
//! println!("gateway version: {}", config.assembler.gateway_version);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::GwconfConfig;

/// Validate a loaded config, or turn the Figment error into diagnostics
/// located in `sources` (`(display path, content)` pairs).
fn finish(
    loaded: Result<GwconfConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<GwconfConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let display = if path.is_relative() {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    Some((display.display().to_string(), content))
}

/// Load from the standard file hierarchy and environment, then validate.
pub fn load_and_validate() -> Result<GwconfConfig, Vec<ConfigError>> {
    finish(loader::load_config(), || {
        loader::config_paths()
            .iter()
            .filter_map(|p| read_source(p))
            .collect()
    })
}

/// Load from TOML text, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<GwconfConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load from one file plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<GwconfConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}
