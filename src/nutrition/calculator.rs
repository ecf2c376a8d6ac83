//! Meal and plan nutrition calculations
//!
//! Unknown ingredient names contribute nothing to totals. They are never an
//! error here; instead they are collected in [`IngredientDiagnostics`] so the
//! caller decides whether to surface them.

use std::collections::BTreeSet;

use serde::Serialize;

use super::table::IngredientTable;
use super::units::{unit_multiplier, MealUnit};
use crate::models::{DayPlan, Macros, MealIngredient, WeeklyPlan};

/// An ingredient measured in a unit that does not match its table basis
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasisMismatch {
    pub name: String,
    pub unit: &'static str,
}

/// Lookup problems seen while computing nutrition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientDiagnostics {
    pub unresolved_ingredients: BTreeSet<String>,
    pub basis_mismatches: BTreeSet<BasisMismatch>,
}

impl IngredientDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved_ingredients.is_empty() && self.basis_mismatches.is_empty()
    }

    fn record_unresolved(&mut self, name: &str) {
        if !self.unresolved_ingredients.contains(name) {
            tracing::warn!("Ingredient '{}' not in nutrition table, counted as zero", name);
            self.unresolved_ingredients.insert(name.to_string());
        }
    }

    fn record_mismatch(&mut self, name: &str, unit: MealUnit) {
        self.basis_mismatches.insert(BasisMismatch {
            name: name.to_string(),
            unit: unit.as_str(),
        });
    }
}

/// Unrounded nutrition of one ingredient line
///
/// The multiplier always follows the line's unit; a unit that disagrees
/// with the table entry's basis is only noted.
pub fn ingredient_nutrition(
    table: &IngredientTable,
    name: &str,
    amount: f64,
    unit: MealUnit,
    diagnostics: &mut IngredientDiagnostics,
) -> Macros {
    let Some(entry) = table.lookup(name) else {
        diagnostics.record_unresolved(name);
        return Macros::zero();
    };

    if entry.basis.expected_kind() != unit.kind() {
        diagnostics.record_mismatch(name, unit);
    }

    entry.nutrition.scale(unit_multiplier(amount, unit))
}

/// Totals of one meal: calories to whole numbers, macros to one decimal
pub fn meal_nutrition(
    table: &IngredientTable,
    ingredients: &[MealIngredient],
    diagnostics: &mut IngredientDiagnostics,
) -> Macros {
    ingredients
        .iter()
        .map(|i| ingredient_nutrition(table, &i.name, i.amount, i.unit, diagnostics))
        .sum::<Macros>()
        .rounded()
}

/// Calories of a template day, or `None` when the day has no data at all
///
/// Recorded totals win over computation. Meal keys with empty lists do not
/// count as data.
pub fn day_calories(
    table: &IngredientTable,
    day: &DayPlan,
    diagnostics: &mut IngredientDiagnostics,
) -> Option<f64> {
    if let Some(calories) = day.daily_totals.and_then(|t| t.calories) {
        return Some(calories);
    }

    if !day.meals.has_ingredients() {
        return None;
    }

    Some(
        day.meals
            .iter()
            .map(|(_, items)| meal_nutrition(table, items, diagnostics).calories)
            .sum(),
    )
}

/// Average daily calories over the days that have data, rounded
///
/// Returns `None` when no day has data.
pub fn plan_average_calories(
    table: &IngredientTable,
    plan: &WeeklyPlan,
    diagnostics: &mut IngredientDiagnostics,
) -> Option<f64> {
    let mut total = 0.0;
    let mut day_count = 0usize;

    for (_, day) in plan.iter() {
        if let Some(calories) = day_calories(table, day, diagnostics) {
            total += calories;
            day_count += 1;
        }
    }

    if day_count == 0 {
        return None;
    }

    Some((total / day_count as f64).round())
}
