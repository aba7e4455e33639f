use super::error::AggregateError;
use super::types::{Comparison, Direction, Metric, Severity, ZeroDenominator};

/// Measures `current` against `baseline`.
///
/// `percent_change` is `100 * (current - baseline) / baseline`; a zero
/// baseline is resolved through `on_zero`.
pub fn compare(
    current: f64,
    baseline: f64,
    on_zero: ZeroDenominator,
) -> Result<Comparison, AggregateError> {
    let delta = current - baseline;

    let percent_change = if baseline == 0.0 {
        if delta == 0.0 {
            0.0
        } else {
            on_zero.resolve("percent change")?
        }
    } else {
        100.0 * delta / baseline
    };

    let direction = if delta > 0.0 {
        Direction::Above
    } else if delta < 0.0 {
        Direction::Below
    } else {
        Direction::Unchanged
    };

    Ok(Comparison {
        current,
        baseline,
        delta,
        percent_change,
        direction,
    })
}

/// Severity tag for display of `metric`.
///
/// Heating and cooling share one convention: above the baseline reads as
/// favorable, below as unfavorable, equal as neutral.
pub fn classify(comparison: &Comparison, _metric: Metric) -> Severity {
    match comparison.direction {
        Direction::Above => Severity::Favorable,
        Direction::Below => Severity::Unfavorable,
        Direction::Unchanged => Severity::Neutral,
    }
}
