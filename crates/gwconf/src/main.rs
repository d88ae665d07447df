// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! gwconf - declarative gateway configuration assembler.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod assemble;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gwconf_config::GwconfConfig;
use tracing::error;

use crate::assemble::{AssembleArgs, run_assemble};

/// gwconf - assemble a gateway configuration snapshot from cluster resources.
#[derive(Parser, Debug)]
#[command(name = "gwconf", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a snapshot and print it as JSON.
    Assemble {
        /// JSON input document; defaults to `input.path` from the configuration.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Print credential and certificate secrets instead of redacting them.
        #[arg(long)]
        unsanitized: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> GwconfConfig {
    let loaded = match path {
        Some(path) => gwconf_config::load_and_validate_path(path),
        None => gwconf_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            gwconf_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over the
/// configured level. Logs go to stderr so stdout stays valid JSON.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gwconf={log_level},gwconf_state={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.assembler.log_level);

    match cli.command {
        Some(Commands::Assemble { input, unsanitized }) => {
            let args = AssembleArgs { input, unsanitized };
            if let Err(e) = run_assemble(&args, &config, &mut std::io::stdout().lock()) {
                error!(error = %e, "assembly failed");
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("gwconf: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assemble_flags_parse() {
        let cli = Cli::try_parse_from(["gwconf", "assemble", "--input", "in.json", "--unsanitized"]).unwrap();
        match cli.command {
            Some(Commands::Assemble { input, unsanitized }) => {
                assert_eq!(input, Some(PathBuf::from("in.json")));
                assert!(unsanitized);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&GwconfConfig::default()).unwrap();
        assert!(rendered.contains("[assembler]"));
        assert!(rendered.contains("gateway_version = \"3.4.0\""));
    }
}
