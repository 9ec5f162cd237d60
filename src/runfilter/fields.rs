//! Field classification.
//!
//! Every filterable field belongs to a family that decides which operators
//! may be used on it. The set of specialized fields is a [`FieldCatalog`]
//! supplied by the caller; anything not listed there is a free-text field.
//!
//! Unlisted fields accept **every** operator. Result metadata is open-ended
//! (`metadata.component`, `metadata.jenkins.job_name`, ...), so narrowing
//! unknown fields would make most of them unusable.

use crate::operators::Operator;
use std::collections::BTreeSet;

/// The family a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFamily {
    String,
    Numeric,
    Array,
    Boolean,
}

impl FieldFamily {
    /// Operators legal for this family, in registry order.
    pub fn operators(self) -> &'static [Operator] {
        use Operator::*;
        match self {
            FieldFamily::String => &[Eq, Ne, Gt, Lt, Gte, Lte, In, Contains, Exists],
            FieldFamily::Numeric => &[Eq, Ne, Gt, Lt, Gte, Lte, In, Exists],
            FieldFamily::Array => &[Eq, In, Contains, Exists],
            FieldFamily::Boolean => &[Eq, Ne, Exists],
        }
    }
}

impl std::fmt::Display for FieldFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldFamily::String => "string",
            FieldFamily::Numeric => "numeric",
            FieldFamily::Array => "array",
            FieldFamily::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A filterable field and its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub family: FieldFamily,
}

const NUMERIC_FIELDS: &[&str] = &[
    "duration",
    "start_time",
    "summary.tests",
    "summary.failures",
    "summary.errors",
    "summary.skips",
    "summary.xfailures",
    "summary.xpasses",
    "metadata.jenkins.build_number",
];

const ARRAY_FIELDS: &[&str] = &["metadata.tags", "metadata.markers"];

const BOOLEAN_FIELDS: &[&str] = &["metadata.flaky", "metadata.skip_report"];

/// Catalog of specialized (non-string) fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    numeric: BTreeSet<String>,
    array: BTreeSet<String>,
    boolean: BTreeSet<String>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            numeric: owned(NUMERIC_FIELDS),
            array: owned(ARRAY_FIELDS),
            boolean: owned(BOOLEAN_FIELDS),
        }
    }
}

impl FieldCatalog {
    /// A catalog with no specialized fields: everything is a string field.
    pub fn empty() -> Self {
        Self {
            numeric: BTreeSet::new(),
            array: BTreeSet::new(),
            boolean: BTreeSet::new(),
        }
    }

    /// Add fields to the specialized families.
    pub fn extend<I, S>(mut self, numeric: I, array: I, boolean: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric.extend(numeric.into_iter().map(Into::into));
        self.array.extend(array.into_iter().map(Into::into));
        self.boolean.extend(boolean.into_iter().map(Into::into));
        self
    }

    pub fn family_of(&self, field: &str) -> FieldFamily {
        if self.numeric.contains(field) {
            FieldFamily::Numeric
        } else if self.array.contains(field) {
            FieldFamily::Array
        } else if self.boolean.contains(field) {
            FieldFamily::Boolean
        } else {
            FieldFamily::String
        }
    }

    pub fn descriptor(&self, field: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: field.to_string(),
            family: self.family_of(field),
        }
    }

    /// Operators legal for `field`; the full registry for unclassified fields.
    pub fn legal_operators(&self, field: &str) -> Vec<Operator> {
        self.family_of(field).operators().to_vec()
    }

    pub fn is_legal(&self, field: &str, operator: Operator) -> bool {
        self.family_of(field).operators().contains(&operator)
    }
}
