// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dossier pipeline tests.
//!
//! Provides scripted mock collaborators for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChat`] - mock LLM provider with pre-scripted replies
//! - [`MockSearch`] - mock web-search provider with pre-scripted result sets

pub mod mock_chat;
pub mod mock_search;

pub use mock_chat::MockChat;
pub use mock_search::{sample_sources, MockSearch};
