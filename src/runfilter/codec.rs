//! Filter encodings.
//!
//! A [`Filter`] has two string forms:
//!
//! - **URL parameter**: key `field`, value `[operator]value`, e.g.
//!   `result=[in]failed;error`. This form round-trips.
//! - **API parameter**: `field<wire>value`, e.g. `result*failed;error`. The
//!   backend never hands filters back in this form, so it is write-only.
//!
//! Multi-value filters join their elements with `;` in both forms, without
//! escaping.

use crate::error::{FilterError, Result};
use crate::fields::FieldCatalog;
use crate::model::{Filter, FilterValue};
use crate::operators::Operator;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_VALUE: Lazy<Regex> = Lazy::new(|| {
    // (?s) so multi-line values survive.
    Regex::new(r"(?s)^\[([^\]]*)\](.*)$").expect("URL value pattern is valid")
});

/// Encode a filter as a URL search parameter.
pub fn to_url_param(filter: &Filter) -> (String, String) {
    (
        filter.field().to_string(),
        format!("[{}]{}", filter.operator().name(), filter.value()),
    )
}

/// Split a URL value into its operator name and remainder.
fn split_url_value(raw: &str) -> Option<(&str, &str)> {
    let caps = URL_VALUE.captures(raw)?;
    let op = caps.get(1).map_or("", |m| m.as_str());
    let value = caps.get(2).map_or("", |m| m.as_str());
    Some((op, value))
}

/// Decode a URL search parameter, strictly.
pub fn from_url_param(catalog: &FieldCatalog, key: &str, raw: &str) -> Result<Filter> {
    let (op_name, value) =
        split_url_value(raw).ok_or_else(|| FilterError::MalformedFilterParam {
            field: key.to_string(),
            raw: raw.to_string(),
        })?;
    let operator: Operator = op_name.parse()?;
    Filter::new(catalog, key, operator, FilterValue::parse(operator.mode(), value))
}

/// Decode a URL search parameter, recovering where possible.
///
/// - A value without a `[operator]` prefix is read as `eq` on the whole value.
/// - An unknown operator is replaced by `eq`.
/// - Empty values and filters that cannot be built are dropped.
///
/// Recoveries are logged; nothing is surfaced to the end user.
pub fn parse_url_param(catalog: &FieldCatalog, key: &str, raw: &str) -> Option<Filter> {
    let (operator, value) = match split_url_value(raw) {
        Some((op_name, value)) => match op_name.parse::<Operator>() {
            Ok(op) => (op, value),
            Err(e) => {
                tracing::warn!(field = key, "{e}; reading as '{}'", Operator::DEFAULT);
                (Operator::DEFAULT, value)
            }
        },
        None => {
            // TODO: reject these outright once saved links have migrated to the bracket form.
            tracing::warn!(field = key, raw, "no [operator] prefix; reading as equality");
            (Operator::DEFAULT, raw)
        }
    };

    let value = FilterValue::parse(operator.mode(), value);
    if value.is_empty() {
        return None;
    }

    match Filter::new(catalog, key, operator, value) {
        Ok(filter) => Some(filter),
        Err(e) => {
            tracing::warn!(field = key, raw, "dropping filter parameter: {e}");
            None
        }
    }
}

/// Encode a filter as a backend filter string.
pub fn to_api_param(filter: &Filter) -> String {
    format!(
        "{}{}{}",
        filter.field(),
        filter.operator().wire(),
        filter.value()
    )
}
