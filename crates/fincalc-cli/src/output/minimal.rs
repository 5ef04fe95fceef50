use serde_json::Value;

use super::{body, format_value, Sections};

/// Key output fields, most specific first. Matched against the last
/// segment of a flattened field name. Savings outrank the payment so a
/// comparison answers with what the extra payment saves.
const PRIORITY_KEYS: [&str; 5] = [
    "interest_saved",
    "monthly_payment",
    "months_saved",
    "total_paid",
    "chart_interval",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result = body(value);

    if let Value::Object(map) = result {
        let sections = Sections::from_map(map);

        for key in PRIORITY_KEYS {
            let hit = sections.fields.iter().find(|(name, val)| {
                !val.is_null() && name.rsplit('.').next() == Some(key)
            });
            if let Some((_, val)) = hit {
                return format_value(val);
            }
        }

        if let Some((key, val)) = sections.fields.first() {
            return format!("{}: {}", key, format_value(val));
        }
    }

    format_value(result)
}
