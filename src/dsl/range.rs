use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::types::CheckError;

/// A monitoring-plugin threshold range.
///
/// `start` of `None` stands for negative infinity (`~`), `end` of `None` for
/// positive infinity. An inverted range alerts when the value lies inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub inverted: bool,
}

impl ThresholdRange {
    pub fn contains(&self, value: f64) -> bool {
        self.start.map_or(true, |start| value >= start) && self.end.map_or(true, |end| value <= end)
    }

    /// Whether `value` should raise an alert for this range.
    pub fn violated_by(&self, value: f64) -> bool {
        self.contains(value) == self.inverted
    }
}

fn invalid(range: &str, reason: impl Into<String>) -> CheckError {
    CheckError::InvalidRange {
        range: range.to_string(),
        reason: reason.into(),
    }
}

fn bound(range: &str, text: &str) -> Result<f64, CheckError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| invalid(range, format!("'{}' is not a number", text)))
}

impl FromStr for ThresholdRange {
    type Err = CheckError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid(input, "range must not be empty"));
        }

        let (inverted, body) = match trimmed.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (start, end) = match body.split_once(':') {
            Some((start, end)) => {
                let start = match start.trim() {
                    "~" => None,
                    "" => Some(0.0),
                    text => Some(bound(input, text)?),
                };
                let end = match end.trim() {
                    "" => None,
                    text => Some(bound(input, text)?),
                };
                (start, end)
            }
            None => (Some(0.0), Some(bound(input, body)?)),
        };

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(invalid(
                    input,
                    format!("start {} is greater than end {}", start, end),
                ));
            }
        }

        Ok(ThresholdRange {
            start,
            end,
            inverted,
        })
    }
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("@")?;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) if start == 0.0 && !self.inverted => write!(f, "{}", end),
            (Some(start), Some(end)) => write!(f, "{}:{}", start, end),
            (Some(start), None) => write!(f, "{}:", start),
            (None, Some(end)) => write!(f, "~:{}", end),
            (None, None) => f.write_str("~:"),
        }
    }
}

impl Serialize for ThresholdRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
