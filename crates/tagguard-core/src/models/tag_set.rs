use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::REPORT_LIST_SEPARATOR;
use crate::errors::SetupError;

/// Tags of one resource: case-sensitive key → value.
///
/// Backed by a `BTreeMap` so iteration and serialization are stable
/// regardless of the order the backend returned the tags in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or overwrite a single tag. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Whether `key` is present with a value that is not blank.
    pub fn has_non_empty(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    /// Additive merge: every tag in `other` overwrites the same key here,
    /// keys not mentioned in `other` are kept.
    pub fn merge(&mut self, other: &TagSet) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Returns a copy of `self` with `other` merged on top.
    pub fn merged(&self, other: &TagSet) -> TagSet {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Number of keys `other` would add that are not already present.
    pub fn new_key_count(&self, other: &TagSet) -> usize {
        other.keys().filter(|k| !self.contains_key(k)).count()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized `key=value;key=value` form used in reports, keys sorted.
    ///
    /// A `\`, `=` or `;` inside a key, and a `\` or `;` inside a value, is
    /// escaped with a backslash so the form parses back unambiguously.
    pub fn to_report_string(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(REPORT_LIST_SEPARATOR);
            }
            push_escaped(&mut out, k, &['=', REPORT_LIST_SEPARATOR]);
            out.push('=');
            push_escaped(&mut out, v, &[REPORT_LIST_SEPARATOR]);
        }
        out
    }

    /// Parse the report form back. Entries without an unescaped `=` are
    /// ignored.
    pub fn from_report_string(s: &str) -> Self {
        let mut tags = TagSet::new();
        let mut key = String::new();
        let mut value: Option<String> = None;
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            let literal = match c {
                '\\' => chars.next(),
                c if c == REPORT_LIST_SEPARATOR => {
                    if let Some(v) = value.take() {
                        tags.insert(std::mem::take(&mut key), v);
                    }
                    key.clear();
                    continue;
                }
                '=' if value.is_none() => {
                    value = Some(String::new());
                    continue;
                }
                c => Some(c),
            };
            if let Some(c) = literal {
                match value.as_mut() {
                    Some(v) => v.push(c),
                    None => key.push(c),
                }
            }
        }
        if let Some(v) = value {
            tags.insert(key, v);
        }
        tags
    }

    /// Parse `k1=v1,k2=v2` assignments as given on the command line.
    ///
    /// The value is everything after the first `=`, so values may contain `=`.
    pub fn parse_assignments(input: &str) -> Result<Self, SetupError> {
        let mut tags = TagSet::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| SetupError::InvalidTagArgument {
                argument: part.to_string(),
                reason: "expected key=value".to_string(),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(SetupError::InvalidTagArgument {
                    argument: part.to_string(),
                    reason: "tag key is empty".to_string(),
                });
            }
            tags.insert(key, value.trim());
        }
        Ok(tags)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

fn push_escaped(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

impl From<BTreeMap<String, String>> for TagSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_report_string())
    }
}
