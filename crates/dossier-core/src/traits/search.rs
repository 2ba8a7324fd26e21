// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web-search provider trait.

use async_trait::async_trait;

use crate::error::DossierError;
use crate::types::SourceRecord;

/// Client for an external web-search provider.
///
/// Implementations normalize provider-specific result shapes into
/// [`SourceRecord`] before returning; nothing downstream branches on raw
/// provider fields. An empty `Ok` vec means "nothing found" and is distinct
/// from `Err` (the search executor converts the latter into an
/// empty-with-error outcome).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Issues one bounded query and returns normalized sources in
    /// provider-rank order.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceRecord>, DossierError>;
}
