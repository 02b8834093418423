use serde_json::Value;
use tracing::debug;

use super::Evaluator;
use crate::dsl::query::{self, Extracted};
use crate::dsl::types::{CheckError, CheckOutcome, Severity};

/// Compares the extracted text against an expected value.
///
/// A sequence of matches passes when any element equals the expected text.
/// A mismatch is reported as a warning.
pub struct TextEvaluator<'a> {
    pub label: &'a str,
    pub query: &'a str,
    pub expected_text: &'a str,
}

impl<'a> Evaluator for TextEvaluator<'a> {
    fn evaluate(&self, document: &Value) -> CheckOutcome {
        match self.extract_texts(document) {
            Ok(texts) => self.compare(&texts),
            Err(error) => CheckOutcome::unknown(self.label, &error),
        }
    }
}

impl<'a> TextEvaluator<'a> {
    fn extract_texts(&self, document: &Value) -> Result<Vec<String>, CheckError> {
        let values = match query::extract(document, self.query)? {
            Extracted::Absent => {
                return Err(CheckError::NoResult {
                    query: self.query.to_string(),
                })
            }
            Extracted::Scalar(value) => vec![value],
            Extracted::Sequence(values) => values,
        };

        let texts: Vec<String> = values
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();

        if texts.is_empty() {
            return Err(CheckError::NonTextValue {
                value: Value::Array(values).to_string(),
            });
        }

        debug!(label = self.label, ?texts, "extracted text values");
        Ok(texts)
    }

    fn compare(&self, texts: &[String]) -> CheckOutcome {
        if texts.iter().any(|text| text == self.expected_text) {
            return CheckOutcome::new(
                self.label,
                Severity::Ok,
                format!("'{}' as expected", self.expected_text),
            );
        }

        let actual = texts
            .iter()
            .map(|text| format!("'{}'", text))
            .collect::<Vec<_>>()
            .join(", ");

        CheckOutcome::new(
            self.label,
            Severity::Warning,
            format!("expected '{}' but is {}", self.expected_text, actual),
        )
    }
}
