// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result-set analysis: size and token statistics for a batch of rows.

use serde::{Deserialize, Serialize};
use trialcost_core::TrialCostError;

use crate::serialize::to_row_string;
use crate::tokenizer::estimate_tokens;

/// Aggregate statistics for an analyzed result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultAnalysis {
    /// Number of rows analyzed.
    pub rows: u64,
    /// Characters across all serialized rows.
    pub total_chars: u64,
    /// Estimated tokens across all serialized rows.
    pub total_tokens: u64,
    /// `total_tokens / rows`, or 0 for an empty result set.
    pub avg_tokens_per_row: f64,
}

/// Serialize each row and accumulate its character length and token estimate.
///
/// Fails with [`TrialCostError::InvalidInput`] naming the row index when a
/// row cannot be rendered as JSON.
pub fn analyze_rows<I>(rows: I) -> Result<QueryResultAnalysis, TrialCostError>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut analysis = QueryResultAnalysis::default();

    for (index, row) in rows.into_iter().enumerate() {
        let rendered = to_row_string(&row).map_err(|e| {
            TrialCostError::invalid_input(format!("rows[{index}]"), e.to_string())
        })?;
        analysis.total_chars += rendered.chars().count() as u64;
        analysis.total_tokens += estimate_tokens(&rendered);
        analysis.rows += 1;
    }

    analysis.avg_tokens_per_row = if analysis.rows > 0 {
        analysis.total_tokens as f64 / analysis.rows as f64
    } else {
        0.0
    };

    Ok(analysis)
}
