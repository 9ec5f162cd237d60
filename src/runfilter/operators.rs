//! Operator registry.
//!
//! This module is the single source of truth for filter operators: their
//! logical names (used in the URL as `[name]`), their wire encoding (used in
//! backend filter strings as `field<wire>value`), and the shape of value they
//! accept.
//!
//! | name       | wire | mode   |
//! |------------|------|--------|
//! | `eq`       | `=`  | single |
//! | `ne`       | `!`  | single |
//! | `gt`       | `>`  | single |
//! | `lt`       | `<`  | single |
//! | `gte`      | `)`  | single |
//! | `lte`      | `(`  | single |
//! | `in`       | `*`  | multi  |
//! | `contains` | `~`  | single |
//! | `exists`   | `@`  | bool   |
//!
//! The enumeration order above is stable and is the order operator choice
//! lists are rendered in.

use crate::error::{FilterError, Result};
use std::str::FromStr;

/// The shape of value an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorMode {
    /// One string value.
    Single,
    /// A list of values, `;`-separated on the wire.
    Multi,
    /// `true` or `false`.
    Bool,
}

/// A logical filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Contains,
    Exists,
}

impl Operator {
    /// Operator used whenever an operator is missing or unrecognized.
    pub const DEFAULT: Operator = Operator::Eq;

    /// The registry entry for this operator.
    pub fn descriptor(self) -> &'static OperatorDescriptor {
        // OPERATORS is laid out in enum order.
        &OPERATORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn wire(self) -> &'static str {
        self.descriptor().wire
    }

    pub fn mode(self) -> OperatorMode {
        self.descriptor().mode
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// All operators in registry order.
    pub fn all() -> impl Iterator<Item = Operator> {
        OPERATORS.iter().map(|d| d.operator)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        operator_for(s).map(|d| d.operator)
    }
}

/// Static description of one operator.
#[derive(Debug, Clone)]
pub struct OperatorDescriptor {
    pub operator: Operator,
    /// Name used in URL parameters, e.g. `[in]`.
    pub name: &'static str,
    /// Character sequence used in backend filter strings.
    pub wire: &'static str,
    pub mode: OperatorMode,
    /// Human readable label for chips and choice lists.
    pub label: &'static str,
}

impl OperatorDescriptor {
    const fn single(operator: Operator, name: &'static str, wire: &'static str) -> Self {
        Self {
            operator,
            name,
            wire,
            mode: OperatorMode::Single,
            label: name,
        }
    }

    const fn mode(mut self, mode: OperatorMode) -> Self {
        self.mode = mode;
        self
    }

    const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

/// Registry of all operators, in enumeration order.
pub const OPERATORS: &[OperatorDescriptor] = &[
    OperatorDescriptor::single(Operator::Eq, "eq", "=").label("is"),
    OperatorDescriptor::single(Operator::Ne, "ne", "!").label("is not"),
    OperatorDescriptor::single(Operator::Gt, "gt", ">").label("greater than"),
    OperatorDescriptor::single(Operator::Lt, "lt", "<").label("less than"),
    OperatorDescriptor::single(Operator::Gte, "gte", ")").label("at least"),
    OperatorDescriptor::single(Operator::Lte, "lte", "(").label("at most"),
    OperatorDescriptor::single(Operator::In, "in", "*")
        .mode(OperatorMode::Multi)
        .label("is one of"),
    OperatorDescriptor::single(Operator::Contains, "contains", "~").label("contains"),
    OperatorDescriptor::single(Operator::Exists, "exists", "@")
        .mode(OperatorMode::Bool)
        .label("exists"),
];

/// Look up an operator by its logical name.
pub fn operator_for(name: &str) -> Result<&'static OperatorDescriptor> {
    OPERATORS
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| FilterError::UnknownOperator(name.to_string()))
}

/// Wire encoding for an operator name.
pub fn wire_encoding(name: &str) -> Result<&'static str> {
    operator_for(name).map(|d| d.wire)
}

/// Resolve an operator name, falling back to [`Operator::DEFAULT`].
///
/// Unknown names are reported on the log, never to the end user.
pub fn resolve_or_default(name: &str) -> Operator {
    match name.parse() {
        Ok(op) => op,
        Err(e) => {
            tracing::warn!(operator = name, "{e}; falling back to '{}'", Operator::DEFAULT);
            Operator::DEFAULT
        }
    }
}
