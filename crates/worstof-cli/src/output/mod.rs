pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::Colorize;
use serde_json::Value;

use crate::OutputFormat;

/// Arrays longer than this are summarised in table and CSV cells.
pub(crate) const MAX_INLINE_ITEMS: usize = 12;

/// Render a command's result in `format`.
///
/// JSON and table output carry the envelope warnings themselves; CSV and
/// minimal output keep stdout machine-readable and send them to stderr.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            csv_out::print_csv(value);
            print_warnings(value);
        }
        OutputFormat::Minimal => {
            minimal::print_minimal(value);
            print_warnings(value);
        }
    }
}

fn print_warnings(value: &Value) {
    for w in envelope_warnings(value) {
        eprintln!("{}: {}", "warning".yellow().bold(), w);
    }
}

/// Warning strings of a `ComputationOutput` envelope, if any.
fn envelope_warnings(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_warnings() {
        let v = json!({"result": {}, "warnings": ["TENARIS is below its barrier", 3]});
        assert_eq!(envelope_warnings(&v), vec!["TENARIS is below its barrier"]);
    }

    #[test]
    fn test_bare_result_has_no_warnings() {
        assert!(envelope_warnings(&json!({"result": {"mu": 0.001}})).is_empty());
        assert!(envelope_warnings(&json!([1, 2])).is_empty());
    }
}
