// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost arithmetic over a [`CostConfig`] price table.
//!
//! database     = seconds / 3600 * price_per_hour
//! output       = trunc(input_tokens * 1.5)
//! model input  = input_tokens / 1M * price_per_mtok
//! model output = output_tokens / 1M * price_per_mtok
//! storage      = chars / 2^30 * price_per_gb
//!
//! Nothing here rounds; formatting belongs to the report.

use serde::{Deserialize, Serialize};
use trialcost_config::CostConfig;

use crate::analyzer::QueryResultAnalysis;

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Expected model output tokens per input token.
pub const OUTPUT_TOKEN_RATIO: f64 = 1.5;

/// Itemized monetary cost of processing one result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub database_cost: f64,
    pub model_input_cost: f64,
    pub model_output_cost: f64,
    pub storage_cost: f64,
    /// Sum of the four components above.
    pub total_cost: f64,
}

/// Output tokens expected for `input_tokens` of input, truncated.
pub fn estimated_output_tokens(input_tokens: u64) -> u64 {
    (input_tokens as f64 * OUTPUT_TOKEN_RATIO) as u64
}

/// Cost of `tokens` at `price_per_mtok` per million.
pub fn token_cost(tokens: u64, price_per_mtok: f64) -> f64 {
    (tokens as f64 / TOKENS_PER_MILLION) * price_per_mtok
}

/// Database compute cost for a query that ran `execution_time_seconds`.
pub fn database_cost(execution_time_seconds: f64, pricing: &CostConfig) -> f64 {
    (execution_time_seconds / SECONDS_PER_HOUR) * pricing.db_compute_per_hour
}

/// Storage cost of `total_chars` characters, one byte each.
pub fn storage_cost(total_chars: u64, pricing: &CostConfig) -> f64 {
    (total_chars as f64 / BYTES_PER_GB) * pricing.storage_per_gb
}

/// Cost of embedding `tokens` tokens.
pub fn embedding_cost(tokens: u64, pricing: &CostConfig) -> f64 {
    token_cost(tokens, pricing.embedding_per_mtok)
}

/// Price an analyzed result set.
///
/// `execution_time_seconds` is trusted here; callers validate it first.
pub fn calculate_costs(
    execution_time_seconds: f64,
    analysis: &QueryResultAnalysis,
    pricing: &CostConfig,
) -> CostBreakdown {
    let database_cost = database_cost(execution_time_seconds, pricing);
    let model_input_cost = token_cost(analysis.total_tokens, pricing.model_input_per_mtok);
    let model_output_cost = token_cost(
        estimated_output_tokens(analysis.total_tokens),
        pricing.model_output_per_mtok,
    );
    let storage_cost = storage_cost(analysis.total_chars, pricing);

    CostBreakdown {
        database_cost,
        model_input_cost,
        model_output_cost,
        storage_cost,
        total_cost: database_cost + model_input_cost + model_output_cost + storage_cost,
    }
}
