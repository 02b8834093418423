use serde_json::Value;
use tracing::{debug, info};

pub mod document;
pub mod dsl;
pub mod evaluators;

use dsl::parsing::ParsingError;
use dsl::query;
use dsl::types::{AggregateResult, CheckError, CheckOutcome, CheckSpec};

/// Narrows the document down with a base selector before any check runs.
pub fn select_base(document: &Value, base: &str) -> Result<Value, CheckError> {
    info!(base, "using base selector");
    let selected = query::search(document, base)?;

    match selected {
        Value::Null => Err(CheckError::NoResult {
            query: base.to_string(),
        }),
        selected => {
            debug!(%selected, "base selector applied");
            Ok(selected)
        }
    }
}

pub fn evaluate(spec: &CheckSpec, document: &Value) -> CheckOutcome {
    debug!(
        label = %spec.label,
        query = %spec.query,
        spec = %serde_json::to_string(&spec.mode).unwrap_or_default(),
        "evaluating check"
    );

    let outcome = evaluators::evaluator(spec).evaluate(document);
    info!(label = %outcome.label, severity = %outcome.severity, detail = %outcome.detail, "check evaluated");

    outcome
}

/// Evaluates every check in input order.
///
/// Checks that failed to parse are reported as unknown in their original
/// position; they never stop the remaining checks from running.
pub fn evaluate_checks(
    checks: &[Result<CheckSpec, ParsingError>],
    document: &Value,
) -> AggregateResult {
    let outcomes = checks
        .iter()
        .map(|check| match check {
            Ok(spec) => evaluate(spec, document),
            Err(ParsingError { label, error }) => CheckOutcome::unknown(label, error),
        })
        .collect();

    AggregateResult::from_outcomes(outcomes)
}
