//! Data models
//!
//! Plan shapes, macro totals, and the database-backed stores.

mod meal_plan;
mod nutrition;
mod nutrition_profile;
mod plan_template;

pub use meal_plan::{
    DayMeals, DayPlan, MealIngredient, MealType, OrderedDays, RecordedTotals, WeeklyPlan,
};
pub use nutrition::{round1, Macros};
pub use nutrition_profile::{
    NutritionProfile, NutritionProfileUpsert, ProfileSource, FALLBACK_CALORIES, FALLBACK_CARBS,
    FALLBACK_FAT, FALLBACK_PROTEIN,
};
pub use plan_template::MealPlanTemplate;
