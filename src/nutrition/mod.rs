//! Nutrition calculation module
//!
//! Ingredient lookup, unit handling, meal totals, and plan scaling.

pub mod assembler;
pub mod calculator;
pub mod scaling;
pub mod table;
pub mod units;

pub use assembler::{
    assemble_scaled_plan, scale_plan, ScaledDayPlan, ScaledIngredient, ScaledPlan,
    ScaledWeeklyPlan, ScalingInfo,
};
pub use calculator::{
    day_calories, ingredient_nutrition, meal_nutrition, plan_average_calories, BasisMismatch,
    IngredientDiagnostics,
};
pub use scaling::{
    resolve_scale_factor, scale_amount, ScaleFactor, MAX_SCALE_FACTOR, MIN_SCALE_FACTOR,
};
pub use table::{ingredient_table, IngredientNutrition, IngredientTable};
pub use units::{unit_multiplier, MealUnit, NutritionBasis, UnitKind};
