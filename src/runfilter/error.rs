use crate::fields::FieldFamily;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Malformed filter parameter for '{field}': {raw}")]
    MalformedFilterParam { field: String, raw: String },

    #[error("Operator '{operator}' is not allowed on {family} field '{field}'")]
    IllegalOperator {
        field: String,
        operator: String,
        family: FieldFamily,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Filter field cannot be empty")]
    EmptyField,

    #[error("'{0}' is a pagination key and cannot be filtered on")]
    ReservedField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
