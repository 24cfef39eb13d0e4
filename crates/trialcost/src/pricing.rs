// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trialcost pricing` command implementation.

use serde::Serialize;
use trialcost_config::model::CostConfig;
use trialcost_core::TrialCostError;

#[derive(Serialize)]
struct PricingSection<'a> {
    pricing: &'a CostConfig,
}

/// Print the effective price table as a `[pricing]` TOML section.
pub fn run_pricing(pricing: &CostConfig) -> Result<(), TrialCostError> {
    print!("{}", pricing_toml(pricing)?);
    Ok(())
}

pub fn pricing_toml(pricing: &CostConfig) -> Result<String, TrialCostError> {
    toml::to_string(&PricingSection { pricing })
        .map_err(|e| TrialCostError::Internal(format!("failed to render price table: {e}")))
}
