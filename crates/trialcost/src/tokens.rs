// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trialcost tokens` command implementation.

use std::io::Read;

use trialcost_config::model::CostConfig;
use trialcost_core::TrialCostError;
use trialcost_cost::estimate_tokens;
use trialcost_cost::pricing::embedding_cost;

/// Run the `trialcost tokens` command on `text`, or on stdin when absent.
pub fn run_tokens(pricing: &CostConfig, text: Option<String>) -> Result<(), TrialCostError> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| TrialCostError::invalid_input("text", format!("cannot read stdin: {e}")))?;
            buf
        }
    };
    print!("{}", token_summary(&text, pricing));
    Ok(())
}

pub fn token_summary(text: &str, pricing: &CostConfig) -> String {
    let tokens = estimate_tokens(text);
    format!(
        "Tokens: {tokens}\nEmbedding Cost: ${:.6}\n",
        embedding_cost(tokens, pricing)
    )
}
