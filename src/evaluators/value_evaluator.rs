use serde_json::Value;
use tracing::debug;

use super::Evaluator;
use crate::dsl::query::{self, Extracted};
use crate::dsl::range::ThresholdRange;
use crate::dsl::types::{CheckError, CheckOutcome, PerfData, Severity};

pub struct ValueEvaluator<'a> {
    pub label: &'a str,
    pub query: &'a str,
    pub warning: Option<&'a ThresholdRange>,
    pub critical: Option<&'a ThresholdRange>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub uom: &'a str,
}

impl<'a> Evaluator for ValueEvaluator<'a> {
    fn evaluate(&self, document: &Value) -> CheckOutcome {
        match self.extract_number(document) {
            Ok(value) => self.classify(value),
            Err(error) => CheckOutcome::unknown(self.label, &error),
        }
    }
}

impl<'a> ValueEvaluator<'a> {
    fn extract_number(&self, document: &Value) -> Result<f64, CheckError> {
        let scalar = match query::extract(document, self.query)? {
            Extracted::Absent => {
                return Err(CheckError::NoResult {
                    query: self.query.to_string(),
                })
            }
            Extracted::Scalar(value) => value,
            Extracted::Sequence(mut values) if values.len() == 1 => values.remove(0),
            Extracted::Sequence(values) => {
                return Err(CheckError::AmbiguousResult {
                    query: self.query.to_string(),
                    count: values.len(),
                })
            }
        };

        let number = to_number(&scalar)?;
        debug!(label = self.label, value = number, "extracted numeric value");

        Ok(number)
    }

    fn classify(&self, value: f64) -> CheckOutcome {
        let violation = |range: Option<&ThresholdRange>, name: &str| {
            range
                .filter(|range| range.violated_by(value))
                .map(|range| violation_detail(value, range, name))
        };

        let (severity, detail) = match violation(self.critical, "critical") {
            Some(detail) => (Severity::Critical, detail),
            None => match violation(self.warning, "warning") {
                Some(detail) => (Severity::Warning, detail),
                None => (Severity::Ok, self.passed_detail(value)),
            },
        };

        CheckOutcome {
            perf_data: Some(PerfData {
                label: self.label.to_string(),
                value,
                uom: self.uom.to_string(),
                warning: self.warning.copied(),
                critical: self.critical.copied(),
                min: self.min,
                max: self.max,
            }),
            ..CheckOutcome::new(self.label, severity, detail)
        }
    }

    /// The value followed by every range it was checked against.
    fn passed_detail(&self, value: f64) -> String {
        let checked: Vec<String> = [(self.warning, "warning"), (self.critical, "critical")]
            .into_iter()
            .filter_map(|(range, name)| range.map(|range| passed_range(range, name)))
            .collect();

        match checked.is_empty() {
            true => value.to_string(),
            false => format!("{} {}", value, checked.join(" and ")),
        }
    }
}

fn passed_range(range: &ThresholdRange, name: &str) -> String {
    let position = match range.inverted {
        true => "outside",
        false => "inside",
    };
    format!("{} {} range {}", position, name, range)
}

fn violation_detail(value: f64, range: &ThresholdRange, name: &str) -> String {
    let position = match range.inverted {
        true => "inside",
        false => "outside",
    };
    format!("{} {} {} range {}", value, position, name, range)
}

/// Numbers are taken as-is; strings are parsed, anything else is rejected.
pub fn to_number(value: &Value) -> Result<f64, CheckError> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    number
        .filter(|number| number.is_finite())
        .ok_or_else(|| CheckError::NonNumericValue {
            value: value.to_string(),
        })
}
