// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `gwconf assemble`: read an input document, assemble, print JSON.
//!
//! The input document is a single JSON object. Its optional `snapshot` field
//! holds the translated services, routes, upstreams and certificates; every
//! other field is a resource list served through a [`MemoryStore`].

use std::io::Write;
use std::path::{Path, PathBuf};

use gwconf_config::GwconfConfig;
use gwconf_core::GwconfError;
use gwconf_state::{Assembler, ConfigurationSnapshot};
use gwconf_store::{DocumentError, MemoryStore, ResourceDocument};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that abort the `assemble` command.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("no input document: pass --input or set input.path")]
    MissingInput,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Gwconf(#[from] GwconfError),

    #[error("failed to write snapshot: {0}")]
    Output(#[source] std::io::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Translated entities plus the cluster resources to assemble them with.
#[derive(Debug, Default, Deserialize)]
pub struct InputDocument {
    #[serde(default)]
    pub snapshot: ConfigurationSnapshot,
    #[serde(flatten)]
    pub resources: ResourceDocument,
}

impl InputDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

/// Options for one `assemble` invocation.
#[derive(Debug, Clone, Default)]
pub struct AssembleArgs {
    pub input: Option<PathBuf>,
    pub unsanitized: bool,
}

/// Assemble the document and return the snapshot to print.
pub fn assemble_document(
    document: InputDocument,
    config: &GwconfConfig,
    unsanitized: bool,
) -> Result<ConfigurationSnapshot, AssembleError> {
    let assembler = Assembler::new(&config.assembler)?;
    let store = MemoryStore::from_document(document.resources)?;

    let mut snapshot = document.snapshot;
    assembler.assemble(&mut snapshot, &store);

    if config.output.sanitize && !unsanitized {
        Ok(snapshot.sanitized_copy())
    } else {
        Ok(snapshot)
    }
}

/// Run the command, writing the snapshot as JSON to `out`.
pub fn run_assemble(
    args: &AssembleArgs,
    config: &GwconfConfig,
    out: &mut impl Write,
) -> Result<(), AssembleError> {
    let path = args
        .input
        .clone()
        .or_else(|| config.input.path.as_ref().map(PathBuf::from))
        .ok_or(AssembleError::MissingInput)?;

    info!(input = %path.display(), "reading input document");
    let document = InputDocument::from_path(&path)?;
    let snapshot = assemble_document(document, config, args.unsanitized)?;

    let rendered = if config.output.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .map_err(AssembleError::Encode)?;

    writeln!(out, "{rendered}").map_err(AssembleError::Output)?;
    Ok(())
}
