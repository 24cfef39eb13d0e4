// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trialcost estimate` and `trialcost query` command implementations.
//!
//! `estimate` prices rows read from a JSON file with a caller-supplied
//! execution time; `query` fetches the rows from SQLite and times them itself.

use std::io::Read;

use serde_json::Value;
use trialcost_config::model::{DatabaseConfig, ReportFormat, TrialCostConfig};
use trialcost_core::TrialCostError;
use trialcost_cost::report::{render_json, render_text};
use trialcost_cost::{CostEstimate, Estimator};
use trialcost_storage::SqliteRowSource;

/// Run the `trialcost estimate` command.
pub fn run_estimate(
    config: &TrialCostConfig,
    rows_path: &str,
    execution_time_seconds: f64,
    name: &str,
    json: bool,
) -> Result<(), TrialCostError> {
    let rows = parse_rows(&read_input(rows_path)?)?;
    let estimator = Estimator::new(config.pricing.clone());
    let estimate = estimator.estimate_rows(&rows, execution_time_seconds)?;
    println!("{}", render(name, &estimate, output_format(config, json))?);
    Ok(())
}

/// Run the `trialcost query` command.
///
/// `db_path` overrides `database.path` from the configuration.
pub async fn run_query(
    config: &TrialCostConfig,
    sql: &str,
    db_path: Option<&str>,
    name: &str,
    json: bool,
) -> Result<(), TrialCostError> {
    let database = DatabaseConfig {
        path: db_path.unwrap_or(&config.database.path).to_string(),
        explain_plan: config.database.explain_plan,
    };
    let source = SqliteRowSource::open(&database).await?;
    let estimator = Estimator::new(config.pricing.clone());
    let estimate = estimator.estimate_query(&source, sql).await?;
    println!("{}", render(name, &estimate, output_format(config, json))?);
    Ok(())
}

/// `--json` wins over the configured format.
pub fn output_format(config: &TrialCostConfig, json: bool) -> ReportFormat {
    if json {
        ReportFormat::Json
    } else {
        config.report.format
    }
}

pub fn render(
    name: &str,
    estimate: &CostEstimate,
    format: ReportFormat,
) -> Result<String, TrialCostError> {
    match format {
        ReportFormat::Text => Ok(render_text(name, estimate)),
        ReportFormat::Json => render_json(estimate),
    }
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &str) -> Result<String, TrialCostError> {
    let result = if path == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).map(|_| content)
    } else {
        std::fs::read_to_string(path)
    };
    result.map_err(|e| TrialCostError::invalid_input("rows", format!("cannot read `{path}`: {e}")))
}

/// Parse a JSON array of rows. Rows are usually objects but any value is accepted.
pub fn parse_rows(content: &str) -> Result<Vec<Value>, TrialCostError> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(other) => Err(TrialCostError::invalid_input(
            "rows",
            format!("expected a JSON array of rows, got {}", json_kind(&other)),
        )),
        Err(e) => Err(TrialCostError::invalid_input(
            "rows",
            format!("invalid JSON: {e}"),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    #[test]
    fn parses_array_of_objects_in_order() {
        let rows = parse_rows(r#"[{"b": 1, "a": 2}, {"id": 3}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_rows("[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_is_rejected() {
        let err = parse_rows(r#"{"id": 1}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input `rows`: expected a JSON array of rows, got an object"
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_rows("[{").unwrap_err();
        assert!(err.to_string().starts_with("invalid input `rows`: invalid JSON"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn reads_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1}}]"#).unwrap();
        let content = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(parse_rows(&content).unwrap(), vec![json!({"id": 1})]);
    }

    #[test]
    fn missing_rows_file_names_the_path() {
        let err = read_input("/nonexistent/rows.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rows.json"));
    }

    #[test]
    fn json_flag_overrides_configured_format() {
        let config = TrialCostConfig::default();
        assert_eq!(output_format(&config, false), ReportFormat::Text);
        assert_eq!(output_format(&config, true), ReportFormat::Json);
    }

    #[test]
    fn renders_both_formats() {
        let rows = vec![json!({"id": 1})];
        let estimate = Estimator::default().estimate_rows(&rows, 1.0).unwrap();

        let text = render("Precedent search", &estimate, ReportFormat::Text).unwrap();
        assert!(text.contains("Cost Analysis Report for: Precedent search"));
        assert!(text.contains("Input Tokens: 7"));

        let out = render("ignored", &estimate, ReportFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["query_stats"]["total_input_tokens"], json!(7));
    }
}
