pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A command's output split into scalar fields and row sets.
#[derive(Default)]
pub struct Sections<'a> {
    /// Scalars, with nested objects flattened to dotted keys.
    pub fields: Vec<(String, &'a Value)>,
    /// Arrays of objects, such as schedule periods or chart points.
    pub row_sets: Vec<(String, &'a [Value])>,
}

impl<'a> Sections<'a> {
    pub fn from_map(map: &'a Map<String, Value>) -> Self {
        let mut sections = Sections::default();
        sections.collect("", map);
        sections
    }

    fn collect(&mut self, prefix: &str, map: &'a Map<String, Value>) {
        for (key, val) in map {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match val {
                Value::Object(inner) => self.collect(&name, inner),
                Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                    self.row_sets.push((name, items.as_slice()));
                }
                _ => self.fields.push((name, val)),
            }
        }
    }

    /// Row set worth exporting on its own: periods first, else the largest.
    pub fn primary_rows(&self) -> Option<&(String, &'a [Value])> {
        self.row_sets
            .iter()
            .find(|(name, _)| name.ends_with("periods"))
            .or_else(|| self.row_sets.iter().max_by_key(|(_, rows)| rows.len()))
    }
}

/// Command payload: the `result` of an envelope, or the value itself.
pub fn body(value: &Value) -> &Value {
    match value.get("result") {
        Some(result @ Value::Object(_)) => result,
        _ => value,
    }
}

/// Column headers in first-seen order across all rows, since the opening
/// period omits its payment fields.
pub fn row_headers(rows: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    headers
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sections_flatten_nested_objects() {
        let value = json!({
            "monthly_payment": "1199.10",
            "totals": { "total_paid": "431676.38" },
            "periods": [{ "index": 0 }, { "index": 1, "payment_due": "1199.10" }],
        });
        let map = value.as_object().unwrap();
        let sections = Sections::from_map(map);
        let names: Vec<&str> = sections.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"monthly_payment"));
        assert!(names.contains(&"totals.total_paid"));
        assert_eq!(sections.primary_rows().unwrap().0, "periods");
    }

    #[test]
    fn test_row_headers_union_in_order() {
        let rows = vec![
            json!({ "index": 0, "remaining_balance": "100" }),
            json!({ "index": 1, "payment_due": "51", "remaining_balance": "50" }),
        ];
        let headers = row_headers(&rows);
        assert_eq!(headers.len(), 3);
        assert!(headers.contains(&"payment_due".to_string()));
    }

    #[test]
    fn test_body_unwraps_envelope() {
        let value = json!({ "result": { "a": 1 }, "warnings": [] });
        assert_eq!(body(&value), &json!({ "a": 1 }));
        let bare = json!({ "b": 2 });
        assert_eq!(body(&bare), &bare);
    }
}
