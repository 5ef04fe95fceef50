use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{body, format_value, row_headers, Sections};

/// Format output as tables using the tabled crate: one field/value table
/// for the scalars, then one table per row set.
pub fn print_table(value: &Value) {
    match body(value) {
        Value::Object(map) => {
            let sections = Sections::from_map(map);
            print_fields(&sections.fields);
            for (name, rows) in &sections.row_sets {
                println!("\n{}:", name);
                print_rows(rows);
            }
        }
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", other),
    }

    print_envelope_notes(value);
}

fn print_fields(fields: &[(String, &Value)]) {
    if fields.is_empty() {
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let headers = row_headers(rows);
    if headers.is_empty() {
        for item in rows {
            println!("{}", format_value(item));
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
