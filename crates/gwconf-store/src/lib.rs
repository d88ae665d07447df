// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the gwconf [`Storer`](gwconf_core::Storer) trait.
//!
//! A [`MemoryStore`] is loaded once from a [`ResourceDocument`] (usually a JSON
//! file exported from the cluster) and then serves every lookup from memory,
//! giving the assembler one consistent view for the whole cycle.

pub mod document;
pub mod memory;

pub use document::{DocumentError, ResourceDocument, SecretDocument};
pub use memory::MemoryStore;
