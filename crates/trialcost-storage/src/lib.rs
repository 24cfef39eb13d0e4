// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite row source for trialcost.
//!
//! Runs queries on a query-only connection through `tokio-rusqlite`, records
//! the query plan, times the fetch and returns rows as ordered JSON objects.

pub mod database;
pub mod source;

pub use database::Database;
pub use source::SqliteRowSource;
