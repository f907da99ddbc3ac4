use serde::Serialize;

use super::document::{MethodSelection, Rounding, RoundingMethod};

/// Upper bound of the management sub-score.
pub const MAX_MANAGEMENT_SCORE: f64 = 15.0;

/// Which candidate produced the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChosenMethod {
    Composite,
    Credit,
    Sum,
}

/// Combines the present candidates; `None` when neither exists.
/// Under `Max` a tie goes to the composite score.
pub fn combine(
    selection: MethodSelection,
    composite: Option<f64>,
    credit: Option<f64>,
) -> Option<(ChosenMethod, f64)> {
    match (selection, composite, credit) {
        (_, None, None) => None,
        (_, Some(composite), None) => Some((ChosenMethod::Composite, composite)),
        (_, None, Some(credit)) => Some((ChosenMethod::Credit, credit)),
        (MethodSelection::Sum, Some(composite), Some(credit)) => {
            Some((ChosenMethod::Sum, composite + credit))
        }
        (MethodSelection::Max, Some(composite), Some(credit)) => {
            if composite >= credit {
                Some((ChosenMethod::Composite, composite))
            } else {
                Some((ChosenMethod::Credit, credit))
            }
        }
    }
}

pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, MAX_MANAGEMENT_SCORE)
}

/// Applies the configured rounding; no rounding block leaves the value as is.
pub fn apply_rounding(value: f64, rounding: Option<&Rounding>) -> f64 {
    let Some(rounding) = rounding else {
        return value;
    };

    let factor = 10f64.powi(rounding.digits.min(12) as i32);
    match rounding.method {
        // Plain truncation of the scaled value: 0.29 truncates to 0.28
        // because 0.29 * 100 is 28.999..
        RoundingMethod::Truncate => (value * factor).trunc() / factor,
        RoundingMethod::Round => (value * factor).round() / factor,
    }
}
