use super::types::{AggregateResult, PerfData};

const NOTHING_TO_CHECK: &str = "Everything looks good";

fn perf_label(label: &str) -> String {
    match label.contains(|c: char| c.is_whitespace() || c == '\'' || c == '=') {
        true => format!("'{}'", label.replace('\'', "''")),
        false => label.to_string(),
    }
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn perf_data(data: &PerfData) -> String {
    let mut fields = vec![
        format!("{}={}{}", perf_label(&data.label), data.value, data.uom),
        optional(&data.warning),
        optional(&data.critical),
        optional(&data.min),
        optional(&data.max),
    ];

    while fields.last().map_or(false, String::is_empty) {
        fields.pop();
    }

    fields.join(";")
}

/// The single status line a monitoring system reads.
pub fn summary_line(result: &AggregateResult) -> String {
    let details = match result.outcomes.is_empty() {
        true => NOTHING_TO_CHECK.to_string(),
        false => result
            .outcomes
            .iter()
            .map(|outcome| format!("{}: {}", outcome.label, outcome.detail))
            .collect::<Vec<_>>()
            .join(", "),
    };

    let metrics = result
        .outcomes
        .iter()
        .filter_map(|outcome| outcome.perf_data.as_ref())
        .map(perf_data)
        .collect::<Vec<_>>();

    match metrics.is_empty() {
        true => format!("{} - {}", result.severity, details),
        false => format!("{} - {} | {}", result.severity, details, metrics.join(" ")),
    }
}

/// The summary line, followed by one line per check when `verbose` is set.
pub fn render(result: &AggregateResult, verbose: u8) -> String {
    let mut lines = vec![summary_line(result)];

    if verbose > 0 {
        lines.extend(result.outcomes.iter().map(|outcome| {
            format!("{} {}: {}", outcome.severity, outcome.label, outcome.detail)
        }));
    }

    lines.join("\n")
}
