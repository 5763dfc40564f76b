//! Attribute criteria for querying documents.
//!
//! A query is a flat list of [`Criterion`] predicates combined with logical
//! AND. Each criterion names a property and a value; the optional
//! [`MatchOp`] selects prefix/suffix/substring comparison instead of exact
//! equality. Comparison always happens on the string form of both sides, so
//! the operators apply to non-string values as well: numbers are compared as
//! their decimal text.

use serde_json::Value;

use crate::document::Document;

/// String comparison operator for a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// The property's string form starts with the criterion value.
    BeginsWith,
    /// The property's string form ends with the criterion value.
    EndsWith,
    /// The property's string form contains the criterion value.
    Contains,
}

/// One attribute predicate: a property name, an expected value, and an
/// optional string operator.
#[derive(Debug, Clone)]
pub struct Criterion {
    /// The property name to test.
    pub name: String,
    /// The value to compare against.
    pub value: Value,
    /// `None` means exact match on the string forms.
    pub op: Option<MatchOp>,
}

impl Criterion {
    /// Creates an exact-match criterion.
    pub fn equals(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Criterion { name: name.into(), value: value.into(), op: None }
    }

    /// Creates a string-prefix criterion.
    pub fn begins_with(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Criterion { name: name.into(), value: value.into(), op: Some(MatchOp::BeginsWith) }
    }

    /// Creates a string-suffix criterion.
    pub fn ends_with(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Criterion { name: name.into(), value: value.into(), op: Some(MatchOp::EndsWith) }
    }

    /// Creates a substring criterion.
    pub fn contains(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Criterion { name: name.into(), value: value.into(), op: Some(MatchOp::Contains) }
    }

    /// Tests this criterion against a document.
    ///
    /// A document matches iff it has the named property and the string forms
    /// of the stored value and the criterion value compare per `op`.
    pub fn matches(&self, document: &Document) -> bool {
        let Ok(stored) = document.get_property(&self.name) else {
            return false;
        };

        let left = coerce(stored);
        let right = coerce(&self.value);

        match self.op {
            None => left == right,
            Some(MatchOp::BeginsWith) => left.starts_with(&right),
            Some(MatchOp::EndsWith) => left.ends_with(&right),
            Some(MatchOp::Contains) => left.contains(&right),
        }
    }
}

/// Renders a JSON value as the string used for comparison: strings verbatim,
/// scalars and composites as their JSON text.
pub(crate) fn coerce(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
