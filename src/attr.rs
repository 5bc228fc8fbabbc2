//! Attribute value building for the code generator.
//!
//! Each builder reduces a resolved [`Value`] to one quoted string
//! fragment, ready for direct concatenation into a markup attribute.

use itertools::Itertools;
use tracing::instrument;

use crate::value::Value;

/// Recursively reduces an aggregate to a single delimited string.
///
/// Nested aggregates flatten first, with the same separators. Object
/// entries emit `key` + `key_value_separator` + value unless the key is
/// a decimal integer, which marks a positional entry and is omitted.
/// Items join in insertion order with `separator`; the empty aggregate
/// flattens to the empty string. Non-aggregate input yields its scalar
/// string form.
///
/// ```
/// use tplkit::{flatten, Value};
///
/// let value = Value::array(["a", "b"]);
/// assert_eq!(flatten(&value, " ", "="), "a b");
/// ```
pub fn flatten(value: &Value, separator: &str, key_value_separator: &str) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| flatten(item, separator, key_value_separator))
            .join(separator),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| {
                let rendered = flatten(item, separator, key_value_separator);
                if is_numeric_key(key) {
                    rendered
                } else {
                    format!("{key}{key_value_separator}{rendered}")
                }
            })
            .join(separator),
        _ => value.render(),
    }
}

fn is_numeric_key(key: &str) -> bool {
    key.parse::<i64>().is_ok()
}

/// Escapes reserved markup characters and both quote characters.
pub fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Builds a generic attribute value, enclosed in `quote`.
///
/// Aggregates are concatenated with no separator:
/// `["a", "b", ["c", ["d"]]]` becomes `abcd`. Pre-rendered content is
/// wrapped directly, without escaping, even when `escape` is set.
///
/// ```
/// use tplkit::{build_value, Value};
///
/// let value = Value::from("<b>hi</b>");
/// assert_eq!(build_value(&value, "\"", true), "\"&lt;b&gt;hi&lt;/b&gt;\"");
/// ```
#[instrument(level = "trace")]
pub fn build_value(value: &Value, quote: &str, escape: bool) -> String {
    if let Value::Rendered(content) = value {
        return format!("{quote}{content}{quote}");
    }
    let mut flat = if value.is_aggregate() {
        flatten(value, "", "=")
    } else {
        value.render()
    };
    if escape {
        flat = escape_html(&flat);
    }
    format!("{quote}{flat}{quote}")
}

/// Builds a data-attribute value.
///
/// Aggregates serialize to JSON and are always enclosed in `'`,
/// ignoring the passed `quote`; JSON output is never escaped a second
/// time. Scalars behave like [`build_value`].
///
/// ```
/// use tplkit::{build_data_value, Value};
///
/// let value = Value::array(["a", "b"]);
/// assert_eq!(build_data_value(&value, "\"", false), r#"'["a","b"]'"#);
/// ```
#[instrument(level = "trace")]
pub fn build_data_value(value: &Value, quote: &str, escape: bool) -> String {
    if value.is_aggregate() {
        return format!("'{}'", value.to_json());
    }
    if let Value::Rendered(content) = value {
        return format!("{quote}{content}{quote}");
    }
    let mut text = value.render();
    if escape {
        text = escape_html(&text);
    }
    format!("{quote}{text}{quote}")
}

/// Builds a style-attribute value, enclosed in `quote`.
///
/// Aggregates flatten with `"; "` between items and `": "` between
/// keys and values, so `{"color": "red"}` becomes `color: red`. No
/// escaping is applied and no trailing separator is emitted.
#[instrument(level = "trace")]
pub fn build_style_value(value: &Value, quote: &str) -> String {
    let text = if value.is_aggregate() {
        flatten(value, "; ", ": ")
    } else {
        value.render()
    };
    format!("{quote}{text}{quote}")
}

/// Builds a class-attribute value, enclosed in `quote`.
///
/// Aggregates flatten with the default separators, so
/// `["a", "b", ["c"]]` becomes `a b c`. No escaping is applied.
#[instrument(level = "trace")]
pub fn build_class_value(value: &Value, quote: &str) -> String {
    let text = if value.is_aggregate() {
        flatten(value, " ", "=")
    } else {
        value.render()
    };
    format!("{quote}{text}{quote}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_and_both_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">'y' & z</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;y&#x27; &amp; z&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn numeric_keys_are_positional() {
        assert!(is_numeric_key("0"));
        assert!(is_numeric_key("-1"));
        assert!(!is_numeric_key("1.5"));
        assert!(!is_numeric_key("color"));
    }
}
