//! Human-readable diffs between entity states for the audit log

use serde_json::Value;

/// Describe top-level field changes between two JSON values
///
/// Timestamps that change on every write (`updated_at`) are skipped.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                if key == "updated_at" {
                    continue;
                }
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_changes() {
        let before = json!({"amount": 10.0, "category": "Rent", "updated_at": "a"});
        let after = json!({"amount": 12.5, "category": "Rent", "updated_at": "b"});

        assert_eq!(
            generate_diff(&before, &after),
            Some("amount: 10.0 -> 12.5".to_string())
        );
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"note": "x"});
        let after = json!({"account": "Visa"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("note: \"x\" -> (removed)"));
        assert!(diff.contains("account: (added) -> \"Visa\""));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"participants": ["a", "b"]});
        assert_eq!(generate_diff(&value, &value), None);
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(
            generate_diff(&json!(1), &json!(2)),
            Some("1 -> 2".to_string())
        );
    }
}
