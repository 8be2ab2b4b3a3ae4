use serde_json::Value;

/// Print just the headline value of the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_paths: [&[&str]; 6] = [
        &["barrier_probability", "probability_pct"],
        &["probability_pct"],
        &["worst_of"],
        &["annualized_volatility_pct"],
        &["sigma"],
        &["redemption"],
    ];

    if let Value::Object(map) = result_obj {
        for path in &priority_paths {
            if let Some(val) = lookup(result_obj, path) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Arrays (performance, payoff, rebase): one headline per row.
    if let Value::Array(rows) = result_obj {
        for row in rows {
            println!("{}", format_row(row));
        }
        return;
    }

    println!("{}", format_minimal(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn format_row(row: &Value) -> String {
    match (row.get("underlying"), row.get("performance_pct")) {
        (Some(name), Some(perf)) => format!("{} {}", format_minimal(name), format_minimal(perf)),
        _ => format_minimal(row),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
