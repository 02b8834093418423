use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::range::ThresholdRange;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckSpec {
    pub label: String,
    pub query: String,
    pub mode: CheckMode,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    ValueThreshold {
        warning: Option<ThresholdRange>,
        critical: Option<ThresholdRange>,
        min: Option<f64>,
        max: Option<f64>,
        uom: String,
    },
    TextEquals {
        expected_text: String,
    },
}

/// Severity ordered by worst-case precedence, `Unknown` being the worst.
///
/// The discriminants double as the plugin exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerfData {
    pub label: String,
    pub value: f64,
    pub uom: String,
    pub warning: Option<ThresholdRange>,
    pub critical: Option<ThresholdRange>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub label: String,
    pub severity: Severity,
    pub detail: String,
    pub perf_data: Option<PerfData>,
}

impl CheckOutcome {
    pub fn new(label: &str, severity: Severity, detail: impl Into<String>) -> Self {
        CheckOutcome {
            label: label.to_string(),
            severity,
            detail: detail.into(),
            perf_data: None,
        }
    }

    pub fn unknown(label: &str, error: &CheckError) -> Self {
        CheckOutcome::new(label, Severity::Unknown, error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub severity: Severity,
    pub outcomes: Vec<CheckOutcome>,
}

impl AggregateResult {
    /// Overall severity is the worst outcome; outcomes keep their input order.
    pub fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let severity = outcomes
            .iter()
            .map(|outcome| outcome.severity)
            .max()
            .unwrap_or(Severity::Ok);

        AggregateResult { severity, outcomes }
    }

    /// A run that could not evaluate any check at all.
    pub fn fatal(label: &str, message: impl Into<String>) -> Self {
        AggregateResult::from_outcomes(vec![CheckOutcome::new(
            label,
            Severity::Unknown,
            message,
        )])
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("malformed check '{spec}': {reason}")]
    MalformedSpec { spec: String, reason: String },

    #[error("invalid range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    #[error("value {value} is not numeric")]
    NonNumericValue { value: String },

    #[error("value {value} is not text")]
    NonTextValue { value: String },

    #[error("invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("no result for query '{query}'")]
    NoResult { query: String },

    #[error("query '{query}' returned {count} values, expected exactly one")]
    AmbiguousResult { query: String, count: usize },
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("unable to load document from {source_name}: {reason}")]
    DocumentUnavailable { source_name: String, reason: String },

    #[error("unable to parse JSON from {source_name}: {reason}")]
    DocumentMalformed { source_name: String, reason: String },
}
