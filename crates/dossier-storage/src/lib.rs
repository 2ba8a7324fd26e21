// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Dossier sessions.
//!
//! Provides WAL-mode SQLite storage with a single-writer concurrency model
//! via `tokio-rusqlite`, and an append-only session log implementing the
//! [`dossier_core::SessionStore`] trait.

pub mod database;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::SqliteSessionStore;
