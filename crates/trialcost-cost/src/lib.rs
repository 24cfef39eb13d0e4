// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token and cost estimation for query result sets.
//!
//! This crate provides:
//! - **Tokenizer**: deterministic heuristic token counts for text and JSON
//! - **Analyzer**: per-result-set character and token totals
//! - **Pricing**: conversion of time, tokens and characters into money
//! - **Estimate**: the validated `estimate` entry point and the [`Estimator`]
//! - **Report**: text and JSON renderings of an estimate

pub mod analyzer;
pub mod estimate;
pub mod pricing;
pub mod report;
pub mod serialize;
pub mod tokenizer;

pub use analyzer::{QueryResultAnalysis, analyze_rows};
pub use estimate::{CostEstimate, Estimator, QueryStats, estimate};
pub use pricing::CostBreakdown;
pub use tokenizer::{estimate_tokens, estimate_value_tokens};
