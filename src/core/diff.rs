//! Human-readable diff rendering for governed surfaces.
//!
//! Two renderers: a shallow structural diff for the manifest's map
//! fields and configuration block, and a per-line diff for template
//! file content. Both are display-only; the reconcilers decide what to
//! do about a difference.

use colored::Colorize;
use serde_json::{Map, Value};

/// Structural diff of two JSON objects: added keys `+`, removed keys
/// `-`, changed keys `~ old => new`. Values render as compact JSON.
pub fn diff_values(before: &Value, after: &Value) -> String {
    let empty = Map::new();
    let before_map = before.as_object().unwrap_or(&empty);
    let after_map = after.as_object().unwrap_or(&empty);

    let mut lines = Vec::new();
    for (key, old) in before_map.iter() {
        match after_map.get(key) {
            None => lines.push(format!("  {} {}: {}", "-".red(), key, old)),
            Some(new) if new != old => {
                lines.push(format!("  {} {}: {} => {}", "~".yellow(), key, old, new));
            }
            Some(_) => {}
        }
    }
    for (key, new) in after_map.iter() {
        if !before_map.contains_key(key) {
            lines.push(format!("  {} {}: {}", "+".green(), key, new));
        }
    }
    lines.join("\n")
}

/// Per-line diff between current and canonical file content, paired
/// by line number.
pub fn diff_lines(current: &str, canonical: &str) -> String {
    let old: Vec<&str> = current.lines().collect();
    let new: Vec<&str> = canonical.lines().collect();

    let mut lines = Vec::new();
    for index in 0..old.len().max(new.len()) {
        let left = old.get(index).copied();
        let right = new.get(index).copied();
        if left == right {
            continue;
        }
        if let Some(line) = left {
            lines.push(format!("  {:>4} {} {}", index + 1, "-".red(), line));
        }
        if let Some(line) = right {
            lines.push(format!("  {:>4} {} {}", index + 1, "+".green(), line));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn value_diff_marks_added_removed_and_changed_keys() {
        plain();
        let before = json!({"build": "old", "gone": "x", "same": "y"});
        let after = json!({"build": "new", "same": "y", "tslib": "^1.10.0"});
        let rendered = diff_values(&before, &after);
        assert!(rendered.contains("~ build: \"old\" => \"new\""));
        assert!(rendered.contains("- gone: \"x\""));
        assert!(rendered.contains("+ tslib: \"^1.10.0\""));
        assert!(!rendered.contains("same"));
    }

    #[test]
    fn value_diff_of_identical_objects_is_empty() {
        plain();
        let value = json!({"a": 1});
        assert!(diff_values(&value, &value).is_empty());
    }

    #[test]
    fn line_diff_pairs_changes_by_line_number() {
        plain();
        let rendered = diff_lines("one\ntwo\n", "one\n2\nthree\n");
        assert!(rendered.contains("2 - two"));
        assert!(rendered.contains("2 + 2"));
        assert!(rendered.contains("3 + three"));
        assert!(!rendered.contains("one"));
    }
}
