// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the gwconf configuration system.

use gwconf_config::diagnostic::ConfigError;
use gwconf_config::model::GwconfConfig;
use gwconf_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_gwconf_config() {
    let toml = r#"
[assembler]
log_level = "debug"
gateway_version = "3.6.1"
warn_legacy_globals = false

[input]
path = "/var/lib/gwconf/resources.json"

[output]
sanitize = false
pretty = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.assembler.log_level, "debug");
    assert_eq!(config.assembler.gateway_version, "3.6.1");
    assert!(!config.assembler.warn_legacy_globals);
    assert_eq!(config.input.path.as_deref(), Some("/var/lib/gwconf/resources.json"));
    assert!(!config.output.sanitize);
    assert!(!config.output.pretty);
}

/// Missing sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.assembler.log_level, "info");
    assert_eq!(config.assembler.gateway_version, "3.4.0");
    assert!(config.assembler.warn_legacy_globals);
    assert!(config.input.path.is_none());
    assert!(config.output.sanitize);
    assert!(config.output.pretty);
}

/// Dotted overrides (the shape env vars are mapped to) win over TOML.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: GwconfConfig = Figment::new()
        .merge(Serialized::defaults(GwconfConfig::default()))
        .merge(Toml::string("[assembler]\nlog_level = \"warn\"\n"))
        .merge(("assembler.log_level", "trace"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.assembler.log_level, "trace");
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_file_uses_defaults() {
    let config = load_and_validate_path(std::path::Path::new("/nonexistent/gwconf.toml"))
        .expect("missing file should be skipped");
    assert_eq!(config.assembler.gateway_version, "3.4.0");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn unknown_top_level_section_rejected() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A typo in [output] becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn typo_produces_unknown_key_with_suggestion() {
    let toml = r#"
[output]
santize = false
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "santize"
                && suggestion.as_deref() == Some("sanitize")
                && valid_keys.contains("pretty")
        })
    });
    assert!(found, "expected UnknownKey for `santize`, got: {errors:?}");
}

/// Invalid type (string where bool expected) is reported with the key path.
#[test]
fn invalid_type_reports_key_path() {
    let toml = r#"
[output]
pretty = "yes"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("pretty"))),
        "got: {errors:?}"
    );
}

/// Validation runs after a successful parse.
#[test]
fn validation_rejects_bad_gateway_version() {
    let toml = r#"
[assembler]
gateway_version = "latest"
"#;

    let errors = load_and_validate_str(toml).expect_err("non-semver should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("gateway_version"))
    ));
}

/// ConfigError renders with miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let error = ConfigError::UnknownKey {
        key: "santize".to_string(),
        suggestion: Some("sanitize".to_string()),
        valid_keys: "sanitize, pretty".to_string(),
        span: None,
        src: None,
    };

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("santize"));
    assert!(buf.contains("sanitize,"));
}
