//! Flag template expansion.
//!
//! A flag template is a command-line token with at most one named
//! placeholder, written `%{value}`.

use crate::error::{ConfigError, Result};
use regex_lite::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// The only placeholder name a flag template may reference.
pub const PLACEHOLDER: &str = "value";

/// Marker that introduces a placeholder.
const MARKER: &str = "%{";

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%\{([^}]*)\}").expect("static placeholder pattern"))
}

/// Expand `template` against `value`.
///
/// Templates without a placeholder marker (including an absent template)
/// are returned unchanged. Every `%{value}` is replaced by the value's
/// string form; any other placeholder name is an interpolation failure.
pub fn interpolate(template: Option<&str>, value: &Value) -> Result<Option<String>> {
    let Some(template) = template else {
        return Ok(None);
    };
    if !template.contains(MARKER) {
        return Ok(Some(template.to_string()));
    }

    let pattern = placeholder_pattern();
    if let Some(bad) = pattern
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .find(|name| name.as_str() != PLACEHOLDER)
    {
        return Err(ConfigError::Interpolation {
            template: template.to_string(),
            placeholder: bad.as_str().to_string(),
        });
    }

    let rendered = value_to_string(value);
    Ok(Some(
        pattern
            .replace_all(template, regex_lite::NoExpand(&rendered))
            .into_owned(),
    ))
}

/// Convenience wrapper for a template that is known to be present.
pub fn interpolate_str(template: &str, value: &Value) -> Result<String> {
    Ok(interpolate(Some(template), value)?.unwrap_or_default())
}

/// String form of an answer value as it appears in a command token.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitutes_value() {
        let out = interpolate_str("--database=%{value}", &json!("postgresql")).unwrap();
        assert_eq!(out, "--database=postgresql");
    }

    #[test]
    fn test_no_marker_unchanged() {
        assert_eq!(interpolate_str("--skip-git", &json!("x")).unwrap(), "--skip-git");
    }

    #[test]
    fn test_absent_template_unchanged() {
        assert_eq!(interpolate(None, &json!("x")).unwrap(), None);
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let err = interpolate_str("--x=%{bogus}", &json!("x")).unwrap_err();
        match err {
            ConfigError::Interpolation {
                template,
                placeholder,
            } => {
                assert_eq!(template, "--x=%{bogus}");
                assert_eq!(placeholder, "bogus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_values() {
        assert_eq!(interpolate_str("--api=%{value}", &json!(true)).unwrap(), "--api=true");
        assert_eq!(interpolate_str("-j%{value}", &json!(0)).unwrap(), "-j0");
        assert_eq!(interpolate_str("--name=%{value}", &json!("")).unwrap(), "--name=");
    }

    #[test]
    fn test_dollar_sign_in_value_is_literal() {
        let out = interpolate_str("--title=%{value}", &json!("$1 app")).unwrap();
        assert_eq!(out, "--title=$1 app");
    }
}
