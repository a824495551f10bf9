//! Declarative validation rule trees
//!
//! A [`Rules`] value is an ordered list of field entries, each carrying the
//! constraints to run against that field. Request-object types build their
//! tree in [`RequestObject::rules`](crate::RequestObject::rules); because the
//! resolved payload is passed in, the tree may differ per request (contextual
//! validation).

use regex::Regex;

/// A single validation constraint.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Value must be a non-empty string after trimming.
    NotBlank,
    /// String length bounds (in characters, not bytes).
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Value must look like an email address.
    Email,
    /// Value must be an http(s) URL.
    Url,
    /// Value must match the given pattern.
    Matches(Regex),
    /// Value must be one of the listed strings.
    OneOf(Vec<String>),
    /// Value must be an object satisfying the nested rule tree; violation
    /// paths are prefixed with the field path (`parent.child`).
    Nested(Rules),
    /// Value must be an array; every element is checked against the inner
    /// constraints and violations carry indexed paths (`tags[0]`).
    Each(Vec<Constraint>),
}

impl Constraint {
    pub fn length(min: usize, max: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn min_length(min: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: None,
        }
    }

    pub fn max_length(max: usize) -> Self {
        Self::Length {
            min: None,
            max: Some(max),
        }
    }

    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(options.into_iter().map(Into::into).collect())
    }
}

/// Rules for one field of the payload.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub(crate) path: String,
    pub(crate) optional: bool,
    pub(crate) constraints: Vec<Constraint>,
}

/// Ordered validation rule tree. Declaration order fixes the order of
/// violations in the resulting list.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    fields: Vec<FieldRules>,
}

impl Rules {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a required field: a missing value is itself a violation.
    pub fn field(mut self, path: impl Into<String>, constraints: Vec<Constraint>) -> Self {
        self.fields.push(FieldRules {
            path: path.into(),
            optional: false,
            constraints,
        });
        self
    }

    /// Declares an optional field: constraints run only when a value is
    /// present.
    pub fn optional(mut self, path: impl Into<String>, constraints: Vec<Constraint>) -> Self {
        self.fields.push(FieldRules {
            path: path.into(),
            optional: true,
            constraints,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields(&self) -> &[FieldRules] {
        &self.fields
    }
}
