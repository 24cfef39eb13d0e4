// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end estimation: rows and execution time in, [`CostEstimate`] out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trialcost_config::CostConfig;
use trialcost_core::{RowSource, TrialCostError};

use crate::analyzer::{QueryResultAnalysis, analyze_rows};
use crate::pricing::{CostBreakdown, calculate_costs, estimated_output_tokens};

/// Raw measurements behind an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStats {
    pub execution_time_seconds: f64,
    pub rows_processed: u64,
    pub total_chars: u64,
    pub total_input_tokens: u64,
    pub estimated_output_tokens: u64,
    pub avg_tokens_per_row: f64,
}

/// A timestamped cost report for one result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// When the estimate was computed (UTC).
    pub timestamp: DateTime<Utc>,
    pub query_stats: QueryStats,
    pub costs: CostBreakdown,
}

impl CostEstimate {
    /// Assemble an estimate from an analysis and its measured execution time.
    ///
    /// Inputs are assumed valid; use [`estimate`] for validated construction.
    pub fn from_analysis(
        execution_time_seconds: f64,
        analysis: &QueryResultAnalysis,
        pricing: &CostConfig,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            query_stats: QueryStats {
                execution_time_seconds,
                rows_processed: analysis.rows,
                total_chars: analysis.total_chars,
                total_input_tokens: analysis.total_tokens,
                estimated_output_tokens: estimated_output_tokens(analysis.total_tokens),
                avg_tokens_per_row: analysis.avg_tokens_per_row,
            },
            costs: calculate_costs(execution_time_seconds, analysis, pricing),
        }
    }
}

/// Estimate the cost of processing `rows`, fetched in `execution_time_seconds`.
///
/// Validates the execution time and the price table before touching the rows,
/// then analyzes every row. Either a complete estimate is returned or nothing.
pub fn estimate<I>(
    rows: I,
    execution_time_seconds: f64,
    pricing: &CostConfig,
) -> Result<CostEstimate, TrialCostError>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    validate_execution_time(execution_time_seconds)?;
    validate_pricing(pricing)?;

    let analysis = analyze_rows(rows)?;
    let estimate = CostEstimate::from_analysis(execution_time_seconds, &analysis, pricing);

    debug!(
        rows = estimate.query_stats.rows_processed,
        total_chars = estimate.query_stats.total_chars,
        input_tokens = estimate.query_stats.total_input_tokens,
        output_tokens = estimate.query_stats.estimated_output_tokens,
        total_cost = estimate.costs.total_cost,
        "cost estimate computed"
    );

    Ok(estimate)
}

/// Reject negative or non-finite execution times.
pub fn validate_execution_time(execution_time_seconds: f64) -> Result<(), TrialCostError> {
    if !execution_time_seconds.is_finite() {
        return Err(TrialCostError::invalid_input(
            "execution_time_seconds",
            format!("must be a finite number, got {execution_time_seconds}"),
        ));
    }
    if execution_time_seconds < 0.0 {
        return Err(TrialCostError::invalid_input(
            "execution_time_seconds",
            format!("must be non-negative, got {execution_time_seconds}"),
        ));
    }
    Ok(())
}

/// Reject price tables with negative or non-finite entries.
pub fn validate_pricing(pricing: &CostConfig) -> Result<(), TrialCostError> {
    match pricing
        .entries()
        .into_iter()
        .find(|(_, price)| !price.is_finite() || *price < 0.0)
    {
        Some((key, price)) => Err(TrialCostError::invalid_input(
            key,
            format!("price must be finite and non-negative, got {price}"),
        )),
        None => Ok(()),
    }
}

/// Estimates queries against a fixed price table.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    pricing: CostConfig,
}

impl Estimator {
    pub fn new(pricing: CostConfig) -> Self {
        Self { pricing }
    }

    /// The price table used for every estimate.
    pub fn pricing(&self) -> &CostConfig {
        &self.pricing
    }

    /// Estimate already-fetched rows.
    pub fn estimate_rows<I>(
        &self,
        rows: I,
        execution_time_seconds: f64,
    ) -> Result<CostEstimate, TrialCostError>
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        estimate(rows, execution_time_seconds, &self.pricing)
    }

    /// Run `query` through `source` and estimate its result set.
    ///
    /// The execution time is whatever the source measured for the fetch.
    pub async fn estimate_query(
        &self,
        source: &dyn RowSource,
        query: &str,
    ) -> Result<CostEstimate, TrialCostError> {
        let outcome = source.fetch(query).await?;
        let seconds = outcome.execution_time_seconds();

        info!(
            source = source.name(),
            rows = outcome.rows.len(),
            execution_time_seconds = seconds,
            "query fetched"
        );

        estimate(&outcome.rows, seconds, &self.pricing)
    }
}
