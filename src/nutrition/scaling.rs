//! Scale factor resolution and ingredient amount scaling

use serde::Serialize;

use super::units::{MealUnit, UnitKind};

/// Smallest multiplier applied to a template plan
pub const MIN_SCALE_FACTOR: f64 = 0.6;
/// Largest multiplier applied to a template plan
pub const MAX_SCALE_FACTOR: f64 = 2.0;
/// Continuous amounts are rounded to this step (grams or ml)
pub const AMOUNT_STEP: f64 = 5.0;

/// Multiplier derived from target and base calories
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleFactor {
    /// target / base before clamping
    pub raw: f64,
    /// The factor actually applied
    pub applied: f64,
    /// Whether `applied` differs from `raw` because of the bounds
    pub clamped: bool,
}

/// `target / base`, clamped to [`MIN_SCALE_FACTOR`, `MAX_SCALE_FACTOR`]
///
/// With no usable base (zero, negative, or a non-finite ratio) the plan is
/// left at 1.0.
pub fn resolve_scale_factor(target_calories: f64, base_calories: f64) -> ScaleFactor {
    let raw = target_calories / base_calories;

    if base_calories <= 0.0 || !raw.is_finite() {
        tracing::warn!(
            "Cannot derive scale factor from target {} and base {}, using 1.0",
            target_calories,
            base_calories
        );
        return ScaleFactor {
            raw: 1.0,
            applied: 1.0,
            clamped: false,
        };
    }

    let applied = raw.clamp(MIN_SCALE_FACTOR, MAX_SCALE_FACTOR);

    ScaleFactor {
        raw,
        applied,
        clamped: applied != raw,
    }
}

/// Scaled amount of one ingredient
///
/// Discrete units never drop below one whole item; continuous units are
/// rounded to steps of five with a floor of five.
pub fn scale_amount(amount: f64, unit: MealUnit, factor: f64) -> f64 {
    let raw = amount * factor;

    match unit.kind() {
        UnitKind::Discrete => {
            if raw < 1.5 {
                1.0
            } else if raw < 2.5 {
                2.0
            } else {
                raw.round()
            }
        }
        UnitKind::Continuous => ((raw / AMOUNT_STEP).round() * AMOUNT_STEP).max(AMOUNT_STEP),
    }
}
