// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::GwconfConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors (does not fail fast).
pub fn validate_config(config: &GwconfConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.assembler.log_level.trim();
    if level.is_empty() {
        errors.push(ConfigError::Validation {
            message: "assembler.log_level must not be empty".to_string(),
        });
    } else if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "assembler.log_level `{level}` is not one of: {}",
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Err(e) = semver::Version::parse(config.assembler.gateway_version.trim()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "assembler.gateway_version `{}` is not a valid semantic version: {e}",
                config.assembler.gateway_version
            ),
        });
    }

    if config.input.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "input.path must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
