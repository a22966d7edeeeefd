//! URL template engine.
//!
//! Path templates contain `{name}` placeholders where `name` is an
//! identifier (`[A-Za-z_][A-Za-z0-9_]*`). Anything else inside braces is
//! literal text.
//!
//! # Example
//!
//! ```rust
//! use stateset::rest::{extract_params, fill};
//! use std::collections::HashMap;
//!
//! let template = "orders/{id}/items/{itemId}";
//! assert_eq!(extract_params(template), vec!["id", "itemId"]);
//!
//! let mut values = HashMap::new();
//! values.insert("id", "A 1");
//! values.insert("itemId", "B");
//! assert_eq!(fill(template, &values), "orders/A%201/items/B");
//! ```

use std::collections::HashMap;
use std::fmt::Display;

/// A parsed piece of a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) if is_identifier(&after_open[..close]) => {
                if open > 0 {
                    result.push(Segment::Literal(&rest[..open]));
                }
                result.push(Segment::Param(&after_open[..close]));
                rest = &after_open[close + 1..];
            }
            _ => {
                // Not a placeholder; keep the brace as literal text
                result.push(Segment::Literal(&rest[..=open]));
                rest = after_open;
            }
        }
    }

    if !rest.is_empty() {
        result.push(Segment::Literal(rest));
    }
    result
}

/// Returns placeholder names in order of appearance, one entry per occurrence.
#[must_use]
pub fn extract_params(template: &str) -> Vec<&str> {
    segments(template)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Param(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Returns placeholder names in order of first appearance, without repeats.
///
/// This is the order in which a dispatch call consumes positional arguments.
#[must_use]
pub fn unique_params(template: &str) -> Vec<&str> {
    let mut seen = Vec::new();
    for name in extract_params(template) {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Escapes characters that are unsafe to embed verbatim: newline, carriage
/// return, double quote, U+2028 and U+2029.
#[must_use]
pub fn escape_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    for c in template.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes a path parameter value.
///
/// Matches `encodeURIComponent`: unreserved characters and `!'()*` are kept.
#[must_use]
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Fills a template's placeholders with percent-encoded values.
///
/// Literal template text is passed through [`escape_template`]. A
/// placeholder with no value in `values` is replaced by an empty string;
/// callers that need a hard failure check [`unique_params`] first, as the
/// [`Dispatcher`](crate::rest::Dispatcher) does.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn fill<V: Display>(template: &str, values: &HashMap<&str, V>) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(&escape_template(text)),
            Segment::Param(name) => {
                if let Some(value) = values.get(name) {
                    out.push_str(&encode_component(&value.to_string()));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_params_in_order() {
        assert_eq!(
            extract_params("orders/{id}/items/{itemId}"),
            vec!["id", "itemId"]
        );
        assert!(extract_params("orders").is_empty());
    }

    #[test]
    fn test_extract_params_lists_duplicates_per_occurrence() {
        assert_eq!(
            extract_params("{id}/copy/{id}/{other}"),
            vec!["id", "id", "other"]
        );
        assert_eq!(unique_params("{id}/copy/{id}/{other}"), vec!["id", "other"]);
    }

    #[test]
    fn test_non_identifier_braces_are_literal() {
        assert!(extract_params("search/{}/{1abc}/{a-b}").is_empty());
        let values: HashMap<&str, &str> = HashMap::new();
        assert_eq!(fill("search/{}/{1abc}", &values), "search/{}/{1abc}");
    }

    #[test]
    fn test_fill_percent_encodes_values() {
        let mut values = HashMap::new();
        values.insert("id", "A 1");
        values.insert("itemId", "B");
        assert_eq!(
            fill("orders/{id}/items/{itemId}", &values),
            "orders/A%201/items/B"
        );
    }

    #[test]
    fn test_fill_leaves_no_placeholders() {
        let mut values = HashMap::new();
        values.insert("a", "x/y");
        values.insert("b", "ü?&=");
        let path = fill("r/{a}/s/{b}/t", &values);
        assert!(!path.contains('{'));
        assert_eq!(path, "r/x%2Fy/s/%C3%BC%3F%26%3D/t");
    }

    #[test]
    fn test_fill_substitutes_duplicate_placeholders() {
        let mut values = HashMap::new();
        values.insert("id", "ord_1");
        assert_eq!(fill("{id}/copy/{id}", &values), "ord_1/copy/ord_1");
    }

    #[test]
    fn test_fill_keeps_identifier_characters_readable() {
        let mut values = HashMap::new();
        values.insert("id", "ord_1-a.b~c!(x)*'");
        assert_eq!(fill("orders/{id}", &values), "orders/ord_1-a.b~c!(x)*'");
    }

    #[test]
    fn test_fill_missing_value_resolves_to_empty_string() {
        let values: HashMap<&str, &str> = HashMap::new();
        assert_eq!(fill("orders/{id}/submit", &values), "orders//submit");
    }

    #[test]
    fn test_fill_handles_numeric_values() {
        let mut values: HashMap<&str, u64> = HashMap::new();
        values.insert("id", 123);
        assert_eq!(fill("warehouses/{id}", &values), "warehouses/123");
    }

    #[test]
    fn test_escape_template_control_characters() {
        assert_eq!(
            escape_template("a\nb\"c\u{2028}d\u{2029}e\rf"),
            "a\\nb\\\"c\\u2028d\\u2029e\\rf"
        );

        let values: HashMap<&str, &str> = HashMap::new();
        assert_eq!(fill("x\n{id}", &values), "x\\n");
    }
}
