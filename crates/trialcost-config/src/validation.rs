// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! finite non-negative prices, a usable database path, a known log level.

use crate::diagnostic::ConfigError;
use crate::model::TrialCostConfig;

/// Log levels accepted by `report.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TrialCostConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, price) in config.pricing.entries() {
        if !price.is_finite() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be a finite number, got {price}"),
            });
        } else if price < 0.0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be non-negative, got {price}"),
            });
        }
    }

    if config.database.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "database.path must not be empty".to_string(),
        });
    }

    let level = config.report.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "report.log_level `{}` is not one of {}",
                config.report.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
