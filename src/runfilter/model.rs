use crate::error::{FilterError, Result};
use crate::fields::FieldCatalog;
use crate::operators::{Operator, OperatorMode};
use serde::{Deserialize, Serialize};

/// Separator between elements of a multi-value filter.
///
/// Elements are not escaped: a value containing `;` does not round-trip.
pub const MULTI_SEPARATOR: char = ';';

/// URL key holding the 1-based page number.
pub const PAGE_KEY: &str = "page";
/// URL key holding the page size.
pub const PAGE_SIZE_KEY: &str = "pageSize";

/// Whether `key` is a pagination key rather than a field name.
pub fn is_reserved_key(key: &str) -> bool {
    key == PAGE_KEY || key == PAGE_SIZE_KEY
}

/// The value side of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
    Bool(bool),
}

impl FilterValue {
    /// Build a value from user input for the given operator mode.
    pub fn parse(mode: OperatorMode, raw: &str) -> Self {
        match mode {
            OperatorMode::Multi => FilterValue::List(split_multi(raw)),
            OperatorMode::Bool | OperatorMode::Single => FilterValue::Text(raw.to_string()),
        }
    }

    /// An empty value means "no filter", not a zero-length filter.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::List(items) => items.iter().all(|s| s.is_empty()),
            FilterValue::Bool(_) => false,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Normalize this value to the shape `mode` expects.
    fn coerce(self, field: &str, mode: OperatorMode) -> Result<Self> {
        let invalid = |reason: String| FilterError::InvalidValue {
            field: field.to_string(),
            reason,
        };
        match (mode, self) {
            (OperatorMode::Multi, FilterValue::Text(s)) => Ok(FilterValue::List(split_multi(&s))),
            (OperatorMode::Multi, FilterValue::Bool(b)) => {
                Ok(FilterValue::List(vec![b.to_string()]))
            }
            (OperatorMode::Single, FilterValue::List(items)) => {
                Ok(FilterValue::Text(join_multi(&items)))
            }
            (OperatorMode::Single, FilterValue::Bool(b)) => Ok(FilterValue::Text(b.to_string())),
            (OperatorMode::Bool, FilterValue::Text(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(FilterValue::Bool(true)),
                "false" => Ok(FilterValue::Bool(false)),
                _ => Err(invalid(format!("expected true or false, got '{}'", s))),
            },
            (OperatorMode::Bool, FilterValue::List(_)) => {
                Err(invalid("a list cannot be used as a boolean".to_string()))
            }
            (_, value) => Ok(value),
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::List(items) => f.write_str(&join_multi(items)),
            FilterValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        FilterValue::List(items)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

fn split_multi(raw: &str) -> Vec<String> {
    raw.split(MULTI_SEPARATOR).map(str::to_string).collect()
}

fn join_multi(items: &[String]) -> String {
    items.join(&MULTI_SEPARATOR.to_string())
}

/// A single applied filter: `field operator value`.
///
/// Only [`Filter::new`] builds one, so the operator is always legal for the
/// field's family and the value always matches the operator's mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    field: String,
    operator: Operator,
    value: FilterValue,
}

impl Filter {
    pub fn new(
        catalog: &FieldCatalog,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Result<Self> {
        let field = field.into();
        if field.is_empty() {
            return Err(FilterError::EmptyField);
        }
        if is_reserved_key(&field) {
            return Err(FilterError::ReservedField(field));
        }
        if !catalog.is_legal(&field, operator) {
            return Err(FilterError::IllegalOperator {
                operator: operator.name().to_string(),
                family: catalog.family_of(&field),
                field,
            });
        }
        let value = value.into().coerce(&field, operator.mode())?;
        if value.is_empty() {
            return Err(FilterError::InvalidValue {
                field,
                reason: "value is empty".to_string(),
            });
        }
        Ok(Self {
            field,
            operator,
            value,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }
}

/// Chip label, e.g. `result is one of failed, error`.
impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            FilterValue::List(items) => write!(
                f,
                "{} {} {}",
                self.field,
                self.operator.label(),
                items.join(", ")
            ),
            value => write!(f, "{} {} {}", self.field, self.operator.label(), value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FieldCatalog {
        FieldCatalog::default()
    }

    #[test]
    fn new_rejects_empty_field() {
        let err = Filter::new(&catalog(), "", Operator::Eq, "x").unwrap_err();
        assert!(matches!(err, FilterError::EmptyField));
    }

    #[test]
    fn new_rejects_pagination_keys() {
        for key in [PAGE_KEY, PAGE_SIZE_KEY] {
            let err = Filter::new(&catalog(), key, Operator::Eq, "home").unwrap_err();
            assert!(matches!(err, FilterError::ReservedField(ref f) if f == key));
        }
        assert!(Filter::new(&catalog(), "pages", Operator::Eq, "home").is_ok());
    }

    #[test]
    fn new_rejects_empty_values() {
        let empty = [
            (Operator::In, FilterValue::List(vec![])),
            (Operator::In, FilterValue::from(";")),
            (Operator::Eq, FilterValue::from("")),
            (Operator::Contains, FilterValue::List(vec![String::new()])),
        ];
        for (operator, value) in empty {
            let err = Filter::new(&catalog(), "result", operator, value).unwrap_err();
            assert!(matches!(err, FilterError::InvalidValue { .. }));
        }
    }

    #[test]
    fn new_rejects_illegal_operator() {
        let err = Filter::new(&catalog(), "duration", Operator::Contains, "5").unwrap_err();
        assert!(matches!(
            err,
            FilterError::IllegalOperator { ref field, .. } if field == "duration"
        ));
    }

    #[test]
    fn multi_operator_splits_text() {
        let f = Filter::new(&catalog(), "result", Operator::In, "failed;error").unwrap();
        assert_eq!(
            f.value(),
            &FilterValue::List(vec!["failed".into(), "error".into()])
        );
        assert_eq!(f.value().to_string(), "failed;error");
    }

    #[test]
    fn single_operator_joins_list() {
        let f = Filter::new(
            &catalog(),
            "component",
            Operator::Eq,
            vec!["a".to_string(), "b".to_string()],
        )
        .unwrap();
        assert_eq!(f.value(), &FilterValue::Text("a;b".into()));
    }

    #[test]
    fn bool_operator_parses_text() {
        let f = Filter::new(&catalog(), "metadata.flaky", Operator::Exists, "TRUE").unwrap();
        assert_eq!(f.value(), &FilterValue::Bool(true));

        let err = Filter::new(&catalog(), "metadata.flaky", Operator::Exists, "maybe");
        assert!(matches!(err, Err(FilterError::InvalidValue { .. })));
    }

    #[test]
    fn empty_values() {
        assert!(FilterValue::from("").is_empty());
        assert!(FilterValue::List(vec![]).is_empty());
        assert!(FilterValue::List(vec![String::new()]).is_empty());
        assert!(!FilterValue::Bool(false).is_empty());
        assert!(!FilterValue::from("x").is_empty());
    }

    #[test]
    fn chip_label() {
        let f = Filter::new(&catalog(), "result", Operator::In, "failed;error").unwrap();
        assert_eq!(f.to_string(), "result is one of failed, error");

        let f = Filter::new(&catalog(), "component", Operator::Ne, "ui").unwrap();
        assert_eq!(f.to_string(), "component is not ui");
    }
}
