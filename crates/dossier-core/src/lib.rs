// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dossier research pipeline.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Dossier workspace. Provider clients and
//! the session store implement traits defined here; everything above them
//! depends only on the trait objects.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DossierError;
pub use types::{
    normalize_compact, ChatMessage, ChatReply, ChatRequest, ChatRole, Entity, EntityKind,
    Interaction, NewInteraction, ReasoningStep, Session, SessionSummary, SourceRecord, StepLevel,
    TokenUsage,
};

// Re-export collaborator traits at crate root.
pub use traits::{ChatProvider, SearchProvider, SessionStore};
