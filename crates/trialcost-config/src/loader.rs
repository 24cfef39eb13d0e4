// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./trialcost.toml` > `~/.config/trialcost/trialcost.toml` >
//! `/etc/trialcost/trialcost.toml` with environment variable overrides via `TRIALCOST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TrialCostConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/trialcost/trialcost.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "trialcost.toml";

/// Per-user config file under the XDG config directory, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trialcost").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/trialcost/trialcost.toml` (system-wide)
/// 3. `~/.config/trialcost/trialcost.toml` (user XDG config)
/// 4. `./trialcost.toml` (local directory)
/// 5. `TRIALCOST_*` environment variables
pub fn load_config() -> Result<TrialCostConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TrialCostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrialCostConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TrialCostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrialCostConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TrialCostConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TRIALCOST_PRICING_STORAGE_PER_GB` must map to
/// `pricing.storage_per_gb`, not `pricing.storage.per.gb`.
fn env_provider() -> Env {
    Env::prefixed("TRIALCOST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let mapped = key
            .as_str()
            .replacen("pricing_", "pricing.", 1)
            .replacen("database_", "database.", 1)
            .replacen("report_", "report.", 1);
        mapped.into()
    })
}
