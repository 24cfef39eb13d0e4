// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for trialcost.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level trialcost configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrialCostConfig {
    /// Per-unit prices used to turn usage into cost.
    #[serde(default)]
    pub pricing: CostConfig,

    /// SQLite row source settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Report output and logging settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Price table: currency per unit for every metered resource.
///
/// Defaults are Claude Opus list prices for model tokens, OpenAI
/// `text-embedding-3-small` for embeddings, and a small managed Postgres
/// instance for compute and storage.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    /// Cost per million model input tokens.
    #[serde(default = "default_model_input_per_mtok")]
    pub model_input_per_mtok: f64,

    /// Cost per million model output tokens.
    #[serde(default = "default_model_output_per_mtok")]
    pub model_output_per_mtok: f64,

    /// Cost per million embedding tokens.
    #[serde(default = "default_embedding_per_mtok")]
    pub embedding_per_mtok: f64,

    /// Cost per hour of database compute.
    #[serde(default = "default_db_compute_per_hour")]
    pub db_compute_per_hour: f64,

    /// Cost per gigabyte (2^30 bytes) of stored result data.
    #[serde(default = "default_storage_per_gb")]
    pub storage_per_gb: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            model_input_per_mtok: default_model_input_per_mtok(),
            model_output_per_mtok: default_model_output_per_mtok(),
            embedding_per_mtok: default_embedding_per_mtok(),
            db_compute_per_hour: default_db_compute_per_hour(),
            storage_per_gb: default_storage_per_gb(),
        }
    }
}

impl CostConfig {
    /// Every price paired with its dotted config key, for validation and display.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("pricing.model_input_per_mtok", self.model_input_per_mtok),
            ("pricing.model_output_per_mtok", self.model_output_per_mtok),
            ("pricing.embedding_per_mtok", self.embedding_per_mtok),
            ("pricing.db_compute_per_hour", self.db_compute_per_hour),
            ("pricing.storage_per_gb", self.storage_per_gb),
        ]
    }
}

fn default_model_input_per_mtok() -> f64 {
    15.0
}

fn default_model_output_per_mtok() -> f64 {
    75.0
}

fn default_embedding_per_mtok() -> f64 {
    0.10
}

fn default_db_compute_per_hour() -> f64 {
    0.50
}

fn default_storage_per_gb() -> f64 {
    0.10
}

/// SQLite row source configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file queried by `trialcost query`.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Run `EXPLAIN QUERY PLAN` before each query and log the plan.
    #[serde(default = "default_explain_plan")]
    pub explain_plan: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            explain_plan: default_explain_plan(),
        }
    }
}

fn default_database_path() -> String {
    "trialcost.db".to_string()
}

fn default_explain_plan() -> bool {
    true
}

/// How estimates are rendered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable report with aligned sections.
    #[default]
    Text,
    /// Pretty-printed JSON of the full estimate.
    Json,
}

/// Report output and logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Default output format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn default_prices_match_published_rates() {
        let pricing = CostConfig::default();
        assert!((pricing.model_input_per_mtok - 15.0).abs() < f64::EPSILON);
        assert!((pricing.model_output_per_mtok - 75.0).abs() < f64::EPSILON);
        assert!((pricing.embedding_per_mtok - 0.10).abs() < f64::EPSILON);
        assert!((pricing.db_compute_per_hour - 0.50).abs() < f64::EPSILON);
        assert!((pricing.storage_per_gb - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn report_format_parses_lowercase() {
        assert_eq!(ReportFormat::from_str("json").unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::Text.to_string(), "text");
    }

    #[test]
    fn partial_pricing_section_keeps_other_defaults() {
        let config: TrialCostConfig = toml::from_str(
            r#"
[pricing]
storage_per_gb = 0.25
"#,
        )
        .unwrap();
        assert!((config.pricing.storage_per_gb - 0.25).abs() < f64::EPSILON);
        assert!((config.pricing.model_input_per_mtok - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.database.path, "trialcost.db");
    }

    #[test]
    fn unknown_pricing_key_is_rejected() {
        let result = toml::from_str::<TrialCostConfig>(
            r#"
[pricing]
gpu_per_hour = 1.0
"#,
        );
        assert!(result.is_err());
    }
}
