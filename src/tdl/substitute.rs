// src/tdl/substitute.rs

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::escape::escape_text;
use super::RequestDocument;

/// A value bound to a `{key}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionValue {
    /// Free text; escaped on insertion.
    Text(String),
    /// Already in the engine's format; inserted verbatim.
    Scalar(String),
}

impl SubstitutionValue {
    fn render(&self) -> String {
        match self {
            SubstitutionValue::Text(s) => escape_text(s),
            SubstitutionValue::Scalar(s) => s.clone(),
        }
    }
}

impl From<&str> for SubstitutionValue {
    fn from(s: &str) -> Self {
        SubstitutionValue::Text(s.to_string())
    }
}

impl From<String> for SubstitutionValue {
    fn from(s: String) -> Self {
        SubstitutionValue::Text(s)
    }
}

impl From<NaiveDate> for SubstitutionValue {
    /// Dates go to the engine as `YYYYMMDD`.
    fn from(d: NaiveDate) -> Self {
        SubstitutionValue::Scalar(d.format("%Y%m%d").to_string())
    }
}

impl From<i64> for SubstitutionValue {
    fn from(n: i64) -> Self {
        SubstitutionValue::Scalar(n.to_string())
    }
}

/// Run-scoped placeholder values (`fromDate`, `toDate`, `targetCompany`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionSet {
    values: BTreeMap<String, SubstitutionValue>,
}

impl SubstitutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<SubstitutionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SubstitutionValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SubstitutionValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SubstitutionValue)> {
        self.values.iter()
    }
}

/// Replace every `{key}` that has a value in `values`. Placeholders without a
/// value are left in place.
pub fn substitute(doc: &RequestDocument, values: &SubstitutionSet) -> RequestDocument {
    let mut text = doc.as_str().to_string();
    for (key, value) in values.iter() {
        let placeholder = format!("{{{key}}}");
        if text.contains(&placeholder) {
            text = text.replace(&placeholder, &value.render());
        }
    }
    RequestDocument::new(text)
}

/// Which of `keys` still appear as `{key}` in `doc`, in the order given.
///
/// Only the keys the compiler emitted are checked. Braces that arrive through
/// the company name, filter formulas or literal field expressions belong to
/// the document and are not placeholders.
pub fn unresolved_placeholders(doc: &RequestDocument, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter(|key| doc.as_str().contains(&format!("{{{key}}}")))
        .map(|key| key.to_string())
        .collect()
}
