// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between row sources and the estimator.

use std::time::Duration;

use serde_json::{Map, Value};

/// One record of a tabular query result, column name to value.
///
/// Column order is preserved as produced by the row source.
pub type Row = Map<String, Value>;

/// The rows returned by a query together with how long the query took.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    /// Result rows in the order the source produced them.
    pub rows: Vec<Row>,
    /// Wall-clock time spent producing the rows.
    pub execution_time: Duration,
}

impl QueryOutcome {
    pub fn new(rows: Vec<Row>, execution_time: Duration) -> Self {
        Self {
            rows,
            execution_time,
        }
    }

    /// Execution time in fractional seconds.
    pub fn execution_time_seconds(&self) -> f64 {
        self.execution_time.as_secs_f64()
    }
}
