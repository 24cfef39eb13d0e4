// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable and JSON renderings of a [`CostEstimate`].

use std::fmt;

use trialcost_core::TrialCostError;

use crate::estimate::CostEstimate;

const TITLE_RULE: usize = 80;
const SECTION_RULE: usize = 40;

/// Plain-text cost report for a named query.
pub struct TextReport<'a> {
    pub name: &'a str,
    pub estimate: &'a CostEstimate,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.estimate.query_stats;
        let costs = &self.estimate.costs;

        writeln!(f)?;
        writeln!(f, "Cost Analysis Report for: {}", self.name)?;
        writeln!(f, "{}", "=".repeat(TITLE_RULE))?;
        writeln!(
            f,
            "Generated on: {}",
            self.estimate.timestamp.format("%Y-%m-%d %H:%M:%S%.6f UTC")
        )?;
        writeln!(f)?;

        writeln!(f, "QUERY STATISTICS")?;
        writeln!(f, "{}", "-".repeat(SECTION_RULE))?;
        writeln!(f, "Execution Time: {:.3} seconds", stats.execution_time_seconds)?;
        writeln!(f, "Rows Processed: {}", group_thousands(stats.rows_processed))?;
        writeln!(f, "Total Characters: {}", group_thousands(stats.total_chars))?;
        writeln!(f, "Input Tokens: {}", group_thousands(stats.total_input_tokens))?;
        writeln!(
            f,
            "Est. Output Tokens: {}",
            group_thousands(stats.estimated_output_tokens)
        )?;
        writeln!(f, "Avg Tokens/Row: {:.1}", stats.avg_tokens_per_row)?;
        writeln!(f)?;

        writeln!(f, "COST BREAKDOWN")?;
        writeln!(f, "{}", "-".repeat(SECTION_RULE))?;
        writeln!(f, "Database Cost: ${:.4}", costs.database_cost)?;
        writeln!(f, "Model Input Cost: ${:.4}", costs.model_input_cost)?;
        writeln!(f, "Model Output Cost: ${:.4}", costs.model_output_cost)?;
        writeln!(f, "Storage Cost: ${:.4}", costs.storage_cost)?;
        writeln!(f, "Total Cost: ${:.4}", costs.total_cost)
    }
}

/// Render the plain-text report for `name`.
pub fn render_text(name: &str, estimate: &CostEstimate) -> String {
    TextReport { name, estimate }.to_string()
}

/// Render the estimate as pretty-printed JSON.
pub fn render_json(estimate: &CostEstimate) -> Result<String, TrialCostError> {
    Ok(serde_json::to_string_pretty(estimate)?)
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
