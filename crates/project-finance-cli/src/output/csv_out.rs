use serde_json::{Map, Value};
use std::io;

type StdoutWriter = csv::Writer<io::StdoutLock<'static>>;

/// Write output as CSV to stdout.
///
/// Sweeps and record lists (discounted flows, projects) become one row per
/// record; plain results become a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(results)) = map.get("results") {
                write_array_csv(&mut wtr, results);
            } else if let Some(Value::Object(result)) = map.get("result") {
                match primary_records(result) {
                    Some(rows) => write_array_csv(&mut wtr, rows),
                    None => write_fields(&mut wtr, result),
                }
            } else {
                write_fields(&mut wtr, map);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    if let Err(e) = wtr.flush() {
        log::error!("failed to flush CSV output: {}", e);
    }
}

/// The record list a result is "about": the project list of a simulation or
/// the per-period detail of an appraisal.
fn primary_records(result: &Map<String, Value>) -> Option<&Vec<Value>> {
    if let Some(Value::Object(portfolio)) = result.get("portfolio") {
        if let Some(Value::Array(projects)) = portfolio.get("projects") {
            return Some(projects);
        }
    }
    match result.get("discounted_flows") {
        Some(Value::Array(rows)) => Some(rows),
        _ => None,
    }
}

fn write_fields(wtr: &mut StdoutWriter, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut StdoutWriter, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
