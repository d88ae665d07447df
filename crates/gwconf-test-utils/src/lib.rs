// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for gwconf integration tests.
//!
//! Provides fixture builders for cluster resources and a harness that runs
//! the full assembly against an in-memory store.
//!
//! # Components
//!
//! - [`fixtures`] - Builders for consumers, secrets, plugin declarations and entities
//! - [`TestHarness`] - Store plus assembler, driven by a builder

pub mod fixtures;
pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
