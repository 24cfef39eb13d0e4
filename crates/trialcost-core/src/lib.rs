// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for trialcost.
//!
//! Provides the error type, the row and query outcome types, and the
//! [`RowSource`] trait implemented by query backends.

pub mod error;
pub mod source;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TrialCostError;
pub use source::RowSource;
pub use types::{QueryOutcome, Row};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct FixedSource {
        rows: Vec<Row>,
    }

    #[async_trait]
    impl RowSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self, _query: &str) -> Result<QueryOutcome, TrialCostError> {
            Ok(QueryOutcome::new(
                self.rows.clone(),
                Duration::from_millis(1500),
            ))
        }
    }

    #[test]
    fn error_variants_display_context() {
        let err = TrialCostError::invalid_input("execution_time_seconds", "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid input `execution_time_seconds`: must be non-negative"
        );

        let storage = TrialCostError::Storage {
            source: Box::new(std::io::Error::other("locked")),
        };
        assert_eq!(storage.to_string(), "storage error: locked");

        let config = TrialCostError::Config("bad".into());
        assert_eq!(config.to_string(), "configuration error: bad");
    }

    #[test]
    fn retryability() {
        assert!(!TrialCostError::invalid_input("rows[0]", "x").is_retryable());
        assert!(!TrialCostError::Config("x".into()).is_retryable());
        assert!(
            TrialCostError::Storage {
                source: Box::new(std::io::Error::other("busy")),
            }
            .is_retryable()
        );
    }

    #[test]
    fn serde_json_errors_convert() {
        let err = serde_json::from_str::<Row>("not json").unwrap_err();
        let converted: TrialCostError = err.into();
        assert!(matches!(converted, TrialCostError::Serialization { .. }));
    }

    #[test]
    fn row_preserves_column_order() {
        let row: Row = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn row_source_is_object_safe() {
        let mut row = Row::new();
        row.insert("id".into(), json!(1));
        let source: Box<dyn RowSource> = Box::new(FixedSource { rows: vec![row] });

        let outcome = source.fetch("SELECT 1").await.unwrap();
        assert_eq!(source.name(), "fixed");
        assert_eq!(outcome.rows.len(), 1);
        assert!((outcome.execution_time_seconds() - 1.5).abs() < f64::EPSILON);
    }
}
