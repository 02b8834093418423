use serde_json::Value;
use tracing::trace;

use super::types::CheckError;

/// Values selected by a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Absent,
    Scalar(Value),
    Sequence(Vec<Value>),
}

/// Runs a JMESPath expression against `document`.
pub fn search(document: &Value, query: &str) -> Result<Value, CheckError> {
    let invalid = |reason: String| CheckError::InvalidQuery {
        query: query.to_string(),
        reason,
    };

    let expression = jmespath::compile(query).map_err(|error| invalid(error.to_string()))?;
    let result = expression
        .search(document)
        .map_err(|error| invalid(error.to_string()))?;

    let value = serde_json::to_value(&*result).map_err(|error| invalid(error.to_string()))?;
    trace!(query, result = %value, "query evaluated");

    Ok(value)
}

/// Runs `query` and classifies what it matched.
///
/// `null` and empty arrays both count as no match.
pub fn extract(document: &Value, query: &str) -> Result<Extracted, CheckError> {
    let extracted = match search(document, query)? {
        Value::Null => Extracted::Absent,
        Value::Array(values) if values.is_empty() => Extracted::Absent,
        Value::Array(values) => Extracted::Sequence(values),
        scalar => Extracted::Scalar(scalar),
    };

    Ok(extracted)
}
