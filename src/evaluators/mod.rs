use serde_json::Value;

use crate::dsl::types::{CheckMode, CheckOutcome, CheckSpec};

pub mod text_evaluator;
pub mod value_evaluator;

pub use text_evaluator::TextEvaluator;
pub use value_evaluator::ValueEvaluator;

pub trait Evaluator {
    fn evaluate(&self, document: &Value) -> CheckOutcome;
}

pub fn evaluator(spec: &CheckSpec) -> Box<dyn Evaluator + '_> {
    match &spec.mode {
        CheckMode::ValueThreshold {
            warning,
            critical,
            min,
            max,
            uom,
        } => Box::new(ValueEvaluator {
            label: &spec.label,
            query: &spec.query,
            warning: warning.as_ref(),
            critical: critical.as_ref(),
            min: *min,
            max: *max,
            uom,
        }),
        CheckMode::TextEquals { expected_text } => Box::new(TextEvaluator {
            label: &spec.label,
            query: &spec.query,
            expected_text,
        }),
    }
}
