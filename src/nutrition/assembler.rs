//! Scaled plan assembly
//!
//! Applies a scale factor to every ingredient of a template plan and
//! recomputes per-ingredient, per-day, and weekly nutrition.

use serde::Serialize;

use super::calculator::{ingredient_nutrition, plan_average_calories, IngredientDiagnostics};
use super::scaling::{resolve_scale_factor, scale_amount, ScaleFactor};
use super::table::IngredientTable;
use super::units::MealUnit;
use crate::models::{round1, DayMeals, DayPlan, Macros, OrderedDays, WeeklyPlan};

/// An ingredient line after scaling, with its nutrition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: MealUnit,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl ScaledIngredient {
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// A scaled day with its totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledDayPlan {
    #[serde(flatten)]
    pub meals: DayMeals<ScaledIngredient>,
    pub daily_totals: Macros,
}

pub type ScaledWeeklyPlan = OrderedDays<ScaledDayPlan>;

/// How the plan was scaled and how close it landed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingInfo {
    pub base_plan_calories: f64,
    pub scale_factor: f64,
    pub raw_scale_factor: f64,
    pub clamped: bool,
    pub target_calories: f64,
    pub achieved_calories: f64,
    pub calorie_delta: f64,
}

/// Result of scaling a template plan
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledPlan {
    pub week_plan: ScaledWeeklyPlan,
    pub weekly_averages: Macros,
    pub scaling_info: ScalingInfo,
    pub diagnostics: IngredientDiagnostics,
}

fn scale_ingredient(
    table: &IngredientTable,
    name: &str,
    amount: f64,
    unit: MealUnit,
    factor: f64,
    diagnostics: &mut IngredientDiagnostics,
) -> ScaledIngredient {
    let amount = scale_amount(amount, unit, factor);
    let nutrition = ingredient_nutrition(table, name, amount, unit, diagnostics).rounded();

    ScaledIngredient {
        name: name.to_string(),
        amount,
        unit,
        calories: nutrition.calories,
        protein: nutrition.protein,
        carbs: nutrition.carbs,
        fat: nutrition.fat,
    }
}

fn scale_day(
    table: &IngredientTable,
    day: &DayPlan,
    factor: f64,
    diagnostics: &mut IngredientDiagnostics,
) -> ScaledDayPlan {
    let mut meals = DayMeals::default();
    let mut totals = Macros::zero();

    for (meal_type, items) in day.meals.iter() {
        let scaled: Vec<ScaledIngredient> = items
            .iter()
            .map(|i| scale_ingredient(table, &i.name, i.amount, i.unit, factor, diagnostics))
            .collect();
        totals = scaled.iter().map(ScaledIngredient::macros).fold(totals, |acc, m| acc + m);
        meals.set(meal_type, scaled);
    }

    ScaledDayPlan {
        meals,
        daily_totals: totals.rounded(),
    }
}

/// Average of daily totals over days that have at least one ingredient
fn weekly_averages(week: &ScaledWeeklyPlan) -> Macros {
    let days: Vec<&ScaledDayPlan> = week
        .values()
        .filter(|d| d.meals.has_ingredients())
        .collect();

    if days.is_empty() {
        return Macros::zero();
    }

    let sum: Macros = days.iter().map(|d| d.daily_totals).sum();
    let avg = sum.scale(1.0 / days.len() as f64);

    Macros {
        calories: avg.calories.round(),
        protein: round1(avg.protein),
        carbs: round1(avg.carbs),
        fat: round1(avg.fat),
    }
}

/// Scale every day of a template with a known factor
pub fn assemble_scaled_plan(
    table: &IngredientTable,
    plan: &WeeklyPlan,
    factor: f64,
    diagnostics: &mut IngredientDiagnostics,
) -> (ScaledWeeklyPlan, Macros) {
    let week: ScaledWeeklyPlan = plan
        .iter()
        .map(|(name, day)| (name.to_string(), scale_day(table, day, factor, diagnostics)))
        .collect();

    let averages = weekly_averages(&week);
    (week, averages)
}

/// Full scaling pipeline: base average, factor, assembly
///
/// Returns `None` when the template has no day with data.
pub fn scale_plan(
    table: &IngredientTable,
    plan: &WeeklyPlan,
    target_calories: f64,
) -> Option<ScaledPlan> {
    let mut diagnostics = IngredientDiagnostics::new();

    let base = plan_average_calories(table, plan, &mut diagnostics)?;
    let factor: ScaleFactor = resolve_scale_factor(target_calories, base);

    let (week_plan, weekly_averages) =
        assemble_scaled_plan(table, plan, factor.applied, &mut diagnostics);

    tracing::debug!(
        "Scaled plan: base {} kcal, factor {:.3} (raw {:.3}), achieved {} kcal for target {}",
        base,
        factor.applied,
        factor.raw,
        weekly_averages.calories,
        target_calories
    );

    Some(ScaledPlan {
        week_plan,
        weekly_averages,
        scaling_info: ScalingInfo {
            base_plan_calories: base,
            scale_factor: factor.applied,
            raw_scale_factor: factor.raw,
            clamped: factor.clamped,
            target_calories,
            achieved_calories: weekly_averages.calories,
            calorie_delta: weekly_averages.calories - target_calories,
        },
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;
    use crate::nutrition::table::IngredientNutrition;
    use crate::nutrition::NutritionBasis;

    /// 100 kcal per 10 g keeps the arithmetic readable
    fn test_table() -> IngredientTable {
        IngredientTable::from_entries([
            IngredientNutrition {
                name: "Basis",
                nutrition: Macros::new(1000.0, 10.0, 100.0, 50.0),
                basis: NutritionBasis::Per100,
            },
            IngredientNutrition {
                name: "Ei",
                nutrition: Macros::new(80.0, 6.0, 1.0, 5.0),
                basis: NutritionBasis::PerUnit,
            },
        ])
    }

    /// Each day: 190 g Basis (1900 kcal) + 1 egg (80 kcal) + 2 g Basis at dinner (20 kcal)
    fn two_thousand_plan() -> WeeklyPlan {
        let day = r#"{
            "ontbijt": [{"name": "Basis", "amount": 190, "unit": "gram"}, {"name": "Ei", "amount": 1, "unit": "stuks"}],
            "diner": [{"name": "Basis", "amount": 2}]
        }"#;
        let json = format!(r#"{{"maandag": {day}, "dinsdag": {day}}}"#);
        WeeklyPlan::from_json(&json).unwrap()
    }

    fn ontbijt(plan: &ScaledPlan, day: &str) -> Vec<ScaledIngredient> {
        plan.week_plan
            .get(day)
            .unwrap()
            .meals
            .get(MealType::Ontbijt)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_target_equals_base_keeps_amounts() {
        let table = test_table();
        let scaled = scale_plan(&table, &two_thousand_plan(), 2000.0).unwrap();
        assert_eq!(scaled.scaling_info.base_plan_calories, 2000.0);
        assert_eq!(scaled.scaling_info.scale_factor, 1.0);

        let items = ontbijt(&scaled, "maandag");
        assert_eq!(items[0].amount, 190.0);
        assert_eq!(items[1].amount, 1.0);
        // 2 g normalises up to the 5 g floor
        let diner = scaled.week_plan.get("maandag").unwrap().meals.get(MealType::Diner).unwrap();
        assert_eq!(diner[0].amount, 5.0);
    }

    #[test]
    fn test_factor_one_and_a_half() {
        let table = test_table();
        let scaled = scale_plan(&table, &two_thousand_plan(), 3000.0).unwrap();
        assert_eq!(scaled.scaling_info.scale_factor, 1.5);
        assert!(!scaled.scaling_info.clamped);

        let items = ontbijt(&scaled, "dinsdag");
        assert_eq!(items[0].amount, 285.0);
        assert_eq!(items[0].calories, 2850.0);
        // one egg * 1.5 -> 2 eggs
        assert_eq!(items[1].amount, 2.0);
        assert_eq!(items[1].calories, 160.0);
    }

    #[test]
    fn test_factor_clamped_to_two() {
        let table = test_table();
        let scaled = scale_plan(&table, &two_thousand_plan(), 6000.0).unwrap();
        assert_eq!(scaled.scaling_info.raw_scale_factor, 3.0);
        assert_eq!(scaled.scaling_info.scale_factor, 2.0);
        assert!(scaled.scaling_info.clamped);

        let items = ontbijt(&scaled, "maandag");
        assert_eq!(items[0].amount, 380.0);
        assert_eq!(items[1].amount, 2.0);
        // 3800 + 160 + 50 (4 g rounds to 5 g)
        assert_eq!(scaled.weekly_averages.calories, 4010.0);
        assert_eq!(scaled.scaling_info.achieved_calories, 4010.0);
        assert_eq!(scaled.scaling_info.calorie_delta, 4010.0 - 6000.0);
    }

    #[test]
    fn test_daily_totals_sum_ingredients() {
        let table = test_table();
        let scaled = scale_plan(&table, &two_thousand_plan(), 2000.0).unwrap();
        let day = scaled.week_plan.get("maandag").unwrap();
        let sum: Macros = day
            .meals
            .iter()
            .flat_map(|(_, items)| items.iter().map(ScaledIngredient::macros))
            .sum();
        assert_eq!(day.daily_totals, sum.rounded());
        assert_eq!(day.daily_totals.calories, 1900.0 + 80.0 + 50.0);
    }

    #[test]
    fn test_unknown_ingredient_is_zero_in_output() {
        let table = test_table();
        let plan = WeeklyPlan::from_json(
            r#"{"maandag": {"lunch": [{"name": "Basis", "amount": 200}, {"name": "Onbekend", "amount": 100}]}}"#,
        )
        .unwrap();
        let scaled = scale_plan(&table, &plan, 2000.0).unwrap();
        let lunch = scaled.week_plan.get("maandag").unwrap().meals.get(MealType::Lunch).unwrap();
        assert_eq!(lunch[1].macros(), Macros::zero());
        assert!(scaled.diagnostics.unresolved_ingredients.contains("Onbekend"));
    }

    #[test]
    fn test_empty_days_kept_but_not_averaged() {
        let table = test_table();
        let plan = WeeklyPlan::from_json(
            r#"{"maandag": {"lunch": [{"name": "Basis", "amount": 200}]}, "dinsdag": {}}"#,
        )
        .unwrap();
        let scaled = scale_plan(&table, &plan, 2000.0).unwrap();
        assert_eq!(scaled.week_plan.len(), 2);
        assert_eq!(scaled.week_plan.get("dinsdag").unwrap().daily_totals, Macros::zero());
        assert_eq!(scaled.weekly_averages.calories, 2000.0);
    }

    #[test]
    fn test_empty_meal_lists_do_not_lower_the_base() {
        let table = test_table();
        let plan = WeeklyPlan::from_json(
            r#"{"maandag": {"lunch": [{"name": "Basis", "amount": 200}]}, "dinsdag": {"lunch": []}}"#,
        )
        .unwrap();
        let scaled = scale_plan(&table, &plan, 2000.0).unwrap();
        assert_eq!(scaled.scaling_info.base_plan_calories, 2000.0);
        assert_eq!(scaled.scaling_info.scale_factor, 1.0);
        assert!(!scaled.scaling_info.clamped);
        assert_eq!(scaled.scaling_info.achieved_calories, 2000.0);
        assert_eq!(scaled.scaling_info.calorie_delta, 0.0);
    }

    #[test]
    fn test_no_data_returns_none() {
        let plan = WeeklyPlan::from_json(r#"{"maandag": {}}"#).unwrap();
        assert!(scale_plan(&test_table(), &plan, 2000.0).is_none());
    }

    #[test]
    fn test_scaled_day_serializes_flat() {
        let table = test_table();
        let scaled = scale_plan(&table, &two_thousand_plan(), 2000.0).unwrap();
        let json = serde_json::to_value(&scaled.week_plan).unwrap();
        assert!(json["maandag"]["ontbijt"].is_array());
        assert_eq!(json["maandag"]["dailyTotals"]["calories"], 2030.0);
        assert_eq!(json["maandag"]["ontbijt"][1]["unit"], "stuks");
        assert!(json["maandag"].get("lunch").is_none());
    }
}
