// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the gwconf configuration assembler.
//!
//! This crate provides the cluster resource types the assembler reads, the
//! read-only [`Storer`] trait through which they are fetched, and the error
//! types shared across the workspace.

pub mod annotations;
pub mod error;
pub mod resources;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use annotations::extract_plugin_names;
pub use error::{GwconfError, StoreError};
pub use resources::{
    ConfigSource, ConsumerResource, OverrideResource, PluginDeclaration, ProxyOverride,
    RouteOverride, Secret, UpstreamOverride,
};
pub use traits::Storer;
pub use types::{ObjectMeta, ResourceKey, ResourceKind};
