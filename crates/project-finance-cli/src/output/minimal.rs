use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for the headline figure of each command in priority order, then
/// falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Headline fields, one per command
    let priority_keys = ["npv", "irr", "payback_period", "total_revenue"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        // Simulation output nests its totals under `summary`
        if let Some(Value::Object(summary)) = map.get("summary") {
            if let Some(total) = summary.get("total_revenue") {
                println!("{}", format_minimal(total));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "undefined".to_string(),
        Value::Object(map) => map
            .get("rate")
            .map(format_minimal)
            .unwrap_or_else(|| serde_json::to_string(value).unwrap_or_default()),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
