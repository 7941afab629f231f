// src/tdl/mod.rs
//
// Everything that produces the export request sent to the engine.

pub mod compile;
pub mod escape;
pub mod expr;
pub mod substitute;

pub use compile::{compile, PERIOD_PLACEHOLDERS};
pub use escape::escape_text;
pub use expr::value_expression;
pub use substitute::{substitute, unresolved_placeholders, SubstitutionSet, SubstitutionValue};

use std::fmt;

/// A complete request document. Built once per table, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDocument(String);

impl RequestDocument {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RequestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
