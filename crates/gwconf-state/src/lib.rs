// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration snapshot assembly.
//!
//! A [`ConfigurationSnapshot`] arrives with services, routes and upstreams
//! already translated. The [`Assembler`] completes it from a [`Storer`]:
//!
//! 1. consumers and their typed credentials,
//! 2. override resources merged onto services, routes and upstreams,
//! 3. plugins expanded across every entity that references them, plus
//!    deduplicated cluster-wide globals.
//!
//! [`Storer`]: gwconf_core::Storer

pub mod assembler;
pub mod consumer;
pub mod credential;
pub mod entities;
pub mod overrides;
pub mod plugins;
pub mod relations;
pub mod snapshot;

pub use assembler::{Assembler, AssemblyOptions};
pub use consumer::Consumer;
pub use credential::{Credential, CredentialError, CredentialKind};
pub use entities::{CaCertificate, Certificate, REDACTED, Route, Service, Target, Upstream};
pub use plugins::{Plugin, PluginError};
pub use relations::{Binding, ForeignRelations, PluginRelations};
pub use snapshot::ConfigurationSnapshot;
