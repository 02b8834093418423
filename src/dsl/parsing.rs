use std::collections::HashSet;

use super::range::ThresholdRange;
use super::types::{CheckError, CheckMode, CheckSpec};

const SEPARATOR: char = ';';

/// A check argument that could not be turned into a [`CheckSpec`].
///
/// `label` is the best-effort label taken from the raw argument, so the
/// failure can still be reported next to the other checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingError {
    pub label: String,
    pub error: CheckError,
}

fn malformed(spec: &str, reason: impl Into<String>) -> CheckError {
    CheckError::MalformedSpec {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

fn label_and_query<'a>(spec: &str, fields: &[&'a str]) -> Result<(&'a str, &'a str), CheckError> {
    let label = fields[0].trim();
    let query = fields[1].trim();

    if label.is_empty() {
        return Err(malformed(spec, "label must not be empty"));
    }
    if query.is_empty() {
        return Err(malformed(spec, "query must not be empty"));
    }

    Ok((label, query))
}

fn optional_range(field: Option<&&str>) -> Result<Option<ThresholdRange>, CheckError> {
    match field.map(|text| text.trim()) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}

fn optional_number(spec: &str, name: &str, field: Option<&&str>) -> Result<Option<f64>, CheckError> {
    match field.map(|text| text.trim()) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| malformed(spec, format!("{} '{}' is not a number", name, text))),
    }
}

/// Parses `label;query[;warning[;critical[;min[;max[;uom]]]]]`.
pub fn parse_check_value(spec: &str) -> Result<CheckSpec, CheckError> {
    let fields: Vec<&str> = spec.split(SEPARATOR).collect();

    if fields.len() < 2 || fields.len() > 7 {
        return Err(malformed(
            spec,
            format!(
                "--check-value expects between 2 and 7 values separated by '{}', found {}",
                SEPARATOR,
                fields.len()
            ),
        ));
    }

    let (label, query) = label_and_query(spec, &fields)?;

    let warning = optional_range(fields.get(2))?;
    let critical = optional_range(fields.get(3))?;
    let min = optional_number(spec, "min", fields.get(4))?;
    let max = optional_number(spec, "max", fields.get(5))?;
    let uom = fields.get(6).map(|uom| uom.trim()).unwrap_or_default();

    Ok(CheckSpec {
        label: label.to_string(),
        query: query.to_string(),
        mode: CheckMode::ValueThreshold {
            warning,
            critical,
            min,
            max,
            uom: uom.to_string(),
        },
    })
}

/// Parses `label;query;expected`.
///
/// The expected text is taken verbatim, surrounding whitespace included.
pub fn parse_check_text_ok(spec: &str) -> Result<CheckSpec, CheckError> {
    let fields: Vec<&str> = spec.split(SEPARATOR).collect();

    if fields.len() != 3 {
        return Err(malformed(
            spec,
            format!(
                "--check-text-ok expects exactly 3 values separated by '{}', found {}",
                SEPARATOR,
                fields.len()
            ),
        ));
    }

    let (label, query) = label_and_query(spec, &fields)?;

    Ok(CheckSpec {
        label: label.to_string(),
        query: query.to_string(),
        mode: CheckMode::TextEquals {
            expected_text: fields[2].to_string(),
        },
    })
}

fn fallback_label(spec: &str) -> String {
    match spec.split(SEPARATOR).next().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => spec.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckKind {
    Value,
    TextOk,
}

/// A check argument as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCheck {
    pub kind: CheckKind,
    pub spec: String,
}

impl RawCheck {
    pub fn value(spec: &str) -> Self {
        RawCheck {
            kind: CheckKind::Value,
            spec: spec.to_string(),
        }
    }

    pub fn text_ok(spec: &str) -> Self {
        RawCheck {
            kind: CheckKind::TextOk,
            spec: spec.to_string(),
        }
    }
}

/// Merges both check flags back into command-line order using their
/// argument positions.
pub fn interleave(
    check_values: Vec<(usize, String)>,
    check_text_oks: Vec<(usize, String)>,
) -> Vec<RawCheck> {
    let values = check_values
        .into_iter()
        .map(|(position, spec)| (position, CheckKind::Value, spec));
    let text_oks = check_text_oks
        .into_iter()
        .map(|(position, spec)| (position, CheckKind::TextOk, spec));

    let mut checks: Vec<_> = values.chain(text_oks).collect();
    checks.sort_by_key(|(position, _, _)| *position);

    checks
        .into_iter()
        .map(|(_, kind, spec)| RawCheck { kind, spec })
        .collect()
}

/// Parses every check argument, preserving input order.
///
/// A label that was already used by an earlier check is rejected.
pub fn parse_checks(checks: &[RawCheck]) -> Vec<Result<CheckSpec, ParsingError>> {
    let mut seen_labels = HashSet::new();

    checks
        .iter()
        .map(|RawCheck { kind, spec: raw }| {
            let parsed = match kind {
                CheckKind::Value => parse_check_value(raw),
                CheckKind::TextOk => parse_check_text_ok(raw),
            };

            let check = parsed.and_then(|check| match seen_labels.insert(check.label.clone()) {
                true => Ok(check),
                false => Err(malformed(
                    raw,
                    format!("label '{}' is already used by another check", check.label),
                )),
            });

            check.map_err(|error| ParsingError {
                label: fallback_label(raw),
                error,
            })
        })
        .collect()
}
