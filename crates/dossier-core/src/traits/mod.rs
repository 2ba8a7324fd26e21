// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External-collaborator trait definitions for the Dossier pipeline.
//!
//! The pipeline consumes three upstream services through narrow seams: the
//! LLM inference service, the web-search provider, and session persistence.
//! All traits use `#[async_trait]` for dynamic dispatch compatibility and
//! are shared as `Arc<dyn _>` across the pipeline.

pub mod chat;
pub mod search;
pub mod sessions;

// Re-export all traits at the traits module level for convenience.
pub use chat::ChatProvider;
pub use search::SearchProvider;
pub use sessions::SessionStore;
