//! Tag key/value constraints enforced by provider tagging APIs.
//!
//! Keys: 1–128 characters, must not start with the reserved `aws:` prefix.
//! Values: 0–256 characters. Both: letters, digits, whitespace and
//! `_ . : / = + - @`.

use crate::constants::{MAX_TAG_KEY_LEN, MAX_TAG_VALUE_LEN, RESERVED_TAG_PREFIX, TAG_PLACEHOLDERS};
use crate::models::TagSet;

fn allowed_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | ':' | '/' | '=' | '+' | '-' | '@')
}

/// Check a tag key. Returns the reason it is rejected.
pub fn validate_tag_key(key: &str) -> Result<(), String> {
    let len = key.chars().count();
    if len == 0 {
        return Err("tag key is empty".to_string());
    }
    if len > MAX_TAG_KEY_LEN {
        return Err(format!(
            "tag key '{key}' is {len} characters, limit {MAX_TAG_KEY_LEN}"
        ));
    }
    if key.to_ascii_lowercase().starts_with(RESERVED_TAG_PREFIX) {
        return Err(format!("tag key '{key}' uses the reserved '{RESERVED_TAG_PREFIX}' prefix"));
    }
    if let Some(c) = key.chars().find(|c| !allowed_char(*c)) {
        return Err(format!("tag key '{key}' contains disallowed character '{c}'"));
    }
    Ok(())
}

/// Check a tag value. Returns the reason it is rejected.
pub fn validate_tag_value(key: &str, value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len > MAX_TAG_VALUE_LEN {
        return Err(format!(
            "value of '{key}' is {len} characters, limit {MAX_TAG_VALUE_LEN}"
        ));
    }
    if let Some(c) = value.chars().find(|c| !allowed_char(*c)) {
        return Err(format!("value of '{key}' contains disallowed character '{c}'"));
    }
    Ok(())
}

pub fn validate_tag(key: &str, value: &str) -> Result<(), String> {
    validate_tag_key(key)?;
    validate_tag_value(key, value)
}

/// Check a template tag whose value may contain placeholders. Placeholders
/// are checked as if empty; the expanded value is checked again before writing.
pub fn validate_template_tag(key: &str, value: &str) -> Result<(), String> {
    let stripped = TAG_PLACEHOLDERS
        .iter()
        .fold(value.to_string(), |acc, p| acc.replace(p, ""));
    validate_tag(key, &stripped)
}

/// Check every tag of a write set, stopping at the first violation.
pub fn validate_tags(tags: &TagSet) -> Result<(), String> {
    tags.iter().try_for_each(|(k, v)| validate_tag(k, v))
}
