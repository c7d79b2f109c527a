// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Taxon integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! model downloads or a database file.
//!
//! # Components
//!
//! - [`MockClassifier`] - Scripted zero-shot classifier that records its inputs
//! - [`MemoryStore`] - In-memory article store

pub mod memory_store;
pub mod mock_classifier;

pub use memory_store::MemoryStore;
pub use mock_classifier::MockClassifier;
