// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row source trait for backends that execute queries (SQLite, etc.).

use async_trait::async_trait;

use crate::error::TrialCostError;
use crate::types::QueryOutcome;

/// A backend that runs a query and returns its rows with the time it took.
///
/// Implementations own their connection; the estimator only borrows them
/// for the duration of a single fetch.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Human-readable name of this source, used in logs.
    fn name(&self) -> &str;

    /// Executes `query` and returns its rows and measured execution time.
    async fn fetch(&self, query: &str) -> Result<QueryOutcome, TrialCostError>;
}
