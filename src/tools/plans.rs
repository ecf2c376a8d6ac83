//! Meal plan operations
//!
//! Transport-independent implementations shared by the HTTP handlers and
//! the MCP tools. All functions are blocking (SQLite).

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::error::{PlanError, PlanResult};
use crate::models::{Macros, MealPlanTemplate, NutritionProfile, ProfileSource, WeeklyPlan};
use crate::nutrition::{
    plan_average_calories, scale_plan, IngredientDiagnostics, IngredientTable, ScaledWeeklyPlan,
    ScalingInfo,
};

/// Parameters of a dynamic plan request
#[derive(Debug, Clone, Default)]
pub struct DynamicPlanRequest {
    pub user_id: Option<String>,
    pub plan_id: Option<String>,
    pub strict_ingredients: bool,
}

/// Profile section of the response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileSummary {
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_carbs: f64,
    pub target_fat: f64,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub profile_source: ProfileSource,
}

impl UserProfileSummary {
    fn new(profile: NutritionProfile, source: ProfileSource) -> Self {
        Self {
            target_calories: profile.target_calories,
            target_protein: profile.target_protein,
            target_carbs: profile.target_carbs,
            target_fat: profile.target_fat,
            age: profile.age,
            weight: profile.weight,
            height: profile.height,
            goal: profile.goal,
            profile_source: source,
        }
    }
}

/// A scaled plan for one member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicPlan {
    pub plan_id: String,
    pub plan_name: String,
    pub user_profile: UserProfileSummary,
    pub scaling_info: ScalingInfo,
    pub week_plan: ScaledWeeklyPlan,
    pub weekly_averages: Macros,
    pub warnings: IngredientDiagnostics,
    pub generated_at: String,
}

/// Template listing entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanSummary {
    pub plan_id: String,
    pub name: String,
    pub day_count: usize,
    /// `None` when the stored plan does not parse or has no data
    pub base_plan_calories: Option<f64>,
    pub updated_at: String,
}

/// Response for import_meal_plan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMealPlanResponse {
    pub plan_id: String,
    pub name: String,
    pub day_count: usize,
    pub base_plan_calories: Option<f64>,
    pub unresolved_ingredients: Vec<String>,
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Scale a stored template to a member's calorie target
pub fn generate_dynamic_plan(
    db: &Database,
    table: &IngredientTable,
    request: &DynamicPlanRequest,
) -> PlanResult<DynamicPlan> {
    let user_id = required(request.user_id.as_deref());
    let plan_id = required(request.plan_id.as_deref());

    let (user_id, plan_id) = match (user_id, plan_id) {
        (Some(u), Some(p)) => (u, p),
        (u, p) => {
            let mut missing = Vec::new();
            if u.is_none() {
                missing.push("userId");
            }
            if p.is_none() {
                missing.push("planId");
            }
            return Err(PlanError::MissingParameters(missing));
        }
    };

    let conn = db.get_conn()?;

    let (profile, source) = NutritionProfile::get_or_fallback(&conn, user_id)?;

    let template = MealPlanTemplate::get(&conn, plan_id)?
        .ok_or_else(|| PlanError::PlanNotFound(plan_id.to_string()))?;

    let plan = template.parse_plan().map_err(|reason| PlanError::MalformedPlan {
        plan_id: plan_id.to_string(),
        reason,
    })?;

    if !plan.has_meal_data() {
        return Err(PlanError::NoMealData(plan_id.to_string()));
    }

    let scaled = scale_plan(table, &plan, profile.target_calories)
        .ok_or_else(|| PlanError::NoMealData(plan_id.to_string()))?;

    if request.strict_ingredients && !scaled.diagnostics.unresolved_ingredients.is_empty() {
        return Err(PlanError::UnresolvedIngredients(
            scaled.diagnostics.unresolved_ingredients.into_iter().collect(),
        ));
    }

    tracing::info!(
        "Generated plan {} for user {}: factor {} ({} -> {} kcal)",
        plan_id,
        user_id,
        scaled.scaling_info.scale_factor,
        scaled.scaling_info.base_plan_calories,
        scaled.scaling_info.achieved_calories
    );

    Ok(DynamicPlan {
        plan_id: template.plan_id,
        plan_name: template.name,
        user_profile: UserProfileSummary::new(profile, source),
        scaling_info: scaled.scaling_info,
        week_plan: scaled.week_plan,
        weekly_averages: scaled.weekly_averages,
        warnings: scaled.diagnostics,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Validate and store a template plan
pub fn import_meal_plan(
    db: &Database,
    table: &IngredientTable,
    plan_id: &str,
    name: &str,
    week_plan: &serde_json::Value,
) -> PlanResult<ImportMealPlanResponse> {
    let plan_id = plan_id.trim();
    let name = name.trim();
    if plan_id.is_empty() {
        return Err(PlanError::InvalidInput("plan_id cannot be empty".to_string()));
    }
    if name.is_empty() {
        return Err(PlanError::InvalidInput("name cannot be empty".to_string()));
    }

    let plan: WeeklyPlan = serde_json::from_value(week_plan.clone())
        .map_err(|e| PlanError::InvalidInput(format!("Invalid plan JSON: {}", e)))?;
    plan.validate().map_err(PlanError::InvalidInput)?;
    if !plan.has_meal_data() {
        return Err(PlanError::NoMealData(plan_id.to_string()));
    }

    let mut diagnostics = IngredientDiagnostics::new();
    let base_plan_calories = plan_average_calories(table, &plan, &mut diagnostics);

    let conn = db.get_conn()?;
    let stored = MealPlanTemplate::upsert(&conn, plan_id, name, &plan)?;

    Ok(ImportMealPlanResponse {
        plan_id: stored.plan_id,
        name: stored.name,
        day_count: plan.len(),
        base_plan_calories,
        unresolved_ingredients: diagnostics.unresolved_ingredients.into_iter().collect(),
    })
}

/// List stored templates with their base calories
pub fn list_meal_plans(db: &Database, table: &IngredientTable) -> PlanResult<Vec<MealPlanSummary>> {
    let conn = db.get_conn()?;
    let templates = MealPlanTemplate::list(&conn)?;

    Ok(templates
        .into_iter()
        .map(|t| {
            let parsed = t.parse_plan().ok();
            let day_count = parsed.as_ref().map(|p| p.len()).unwrap_or(0);
            let base_plan_calories = parsed.as_ref().and_then(|p| {
                plan_average_calories(table, p, &mut IngredientDiagnostics::new())
            });
            MealPlanSummary {
                plan_id: t.plan_id,
                name: t.name,
                day_count,
                base_plan_calories,
                updated_at: t.updated_at,
            }
        })
        .collect())
}

pub fn delete_meal_plan(db: &Database, plan_id: &str) -> PlanResult<bool> {
    let conn = db.get_conn()?;
    Ok(MealPlanTemplate::delete(&conn, plan_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{MealType, NutritionProfileUpsert};
    use crate::nutrition::{ingredient_table, MealUnit};
    use serde_json::json;

    fn database() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    /// 2 Ei (156) + 500 g Kipfilet (550) + 250 g Rijst (875) = 1581 kcal per day
    fn template() -> serde_json::Value {
        let day = json!({
            "ontbijt": [{"name": "Ei", "amount": 2, "unit": "stuks"}],
            "lunch": [{"name": "Kipfilet", "amount": 500}],
            "diner": [{"name": "Rijst", "amount": 250, "unit": "gram"}]
        });
        json!({"maandag": day.clone(), "dinsdag": day})
    }

    fn request(user: Option<&str>, plan: Option<&str>) -> DynamicPlanRequest {
        DynamicPlanRequest {
            user_id: user.map(String::from),
            plan_id: plan.map(String::from),
            strict_ingredients: false,
        }
    }

    fn set_target(db: &Database, user: &str, calories: f64) {
        db.with_conn(|conn| {
            NutritionProfile::upsert(
                conn,
                user,
                &NutritionProfileUpsert {
                    target_calories: calories,
                    target_protein: 180.0,
                    target_carbs: 250.0,
                    target_fat: 70.0,
                    age: None,
                    weight: None,
                    height: None,
                    goal: Some("cut".to_string()),
                },
            )
        })
        .unwrap();
    }

    #[test]
    fn test_missing_parameters() {
        let db = database();
        let err = generate_dynamic_plan(&db, ingredient_table(), &request(None, Some("p"))).unwrap_err();
        assert!(matches!(err, PlanError::MissingParameters(ref m) if m == &vec!["userId"]));

        let err = generate_dynamic_plan(&db, ingredient_table(), &request(Some("  "), None)).unwrap_err();
        assert!(matches!(err, PlanError::MissingParameters(ref m) if m.len() == 2));
        assert!(err.to_string().contains("userId") && err.to_string().contains("planId"));
    }

    #[test]
    fn test_plan_not_found() {
        let db = database();
        let err = generate_dynamic_plan(&db, ingredient_table(), &request(Some("u"), Some("nope"))).unwrap_err();
        assert!(matches!(err, PlanError::PlanNotFound(_)));
    }

    #[test]
    fn test_plan_without_meals() {
        let db = database();
        db.with_conn(|conn| MealPlanTemplate::insert_raw(conn, "leeg", "Leeg", r#"{"maandag": {}}"#))
            .unwrap();
        let err = generate_dynamic_plan(&db, ingredient_table(), &request(Some("u"), Some("leeg"))).unwrap_err();
        assert!(matches!(err, PlanError::NoMealData(_)));
    }

    #[test]
    fn test_malformed_plan() {
        let db = database();
        db.with_conn(|conn| MealPlanTemplate::insert_raw(conn, "kapot", "Kapot", "{\"maandag\": ["))
            .unwrap();
        let err = generate_dynamic_plan(&db, ingredient_table(), &request(Some("u"), Some("kapot"))).unwrap_err();
        assert!(matches!(err, PlanError::MalformedPlan { .. }));
    }

    #[test]
    fn test_fallback_profile_and_scaling() {
        let db = database();
        let table = ingredient_table();
        let imported = import_meal_plan(&db, table, "basis", "Basis", &template()).unwrap();
        // 156 + 550 + 875
        assert_eq!(imported.base_plan_calories, Some(1581.0));

        let plan = generate_dynamic_plan(&db, table, &request(Some("nieuw"), Some("basis"))).unwrap();
        assert_eq!(plan.user_profile.profile_source, ProfileSource::Fallback);
        assert_eq!(plan.scaling_info.target_calories, 2000.0);
        assert_eq!(plan.scaling_info.base_plan_calories, 1581.0);
        assert!((plan.scaling_info.scale_factor - 2000.0 / 1581.0).abs() < 1e-9);
        assert_eq!(plan.plan_name, "Basis");
        assert!(plan.warnings.is_clean());
        assert!(plan.generated_at.ends_with('Z'));
    }

    #[test]
    fn test_stored_profile_is_used() {
        let db = database();
        let table = ingredient_table();
        import_meal_plan(&db, table, "basis", "Basis", &template()).unwrap();
        set_target(&db, "u-1", 10_000.0);

        let plan = generate_dynamic_plan(&db, table, &request(Some("u-1"), Some("basis"))).unwrap();
        assert_eq!(plan.user_profile.profile_source, ProfileSource::Stored);
        assert_eq!(plan.scaling_info.scale_factor, 2.0);
        assert!(plan.scaling_info.clamped);

        let lunch = plan.week_plan.get("maandag").unwrap().meals.get(MealType::Lunch).unwrap();
        assert_eq!(lunch[0].amount, 1000.0);
        assert_eq!(lunch[0].unit, MealUnit::Gram);
        assert!(plan.scaling_info.calorie_delta < 0.0);
    }

    #[test]
    fn test_unresolved_ingredients_strict_and_lenient() {
        let db = database();
        let table = ingredient_table();
        let plan = json!({"maandag": {"lunch": [
            {"name": "Kipfilet", "amount": 200},
            {"name": "Kipfilett", "amount": 100}
        ]}});
        let imported = import_meal_plan(&db, table, "typo", "Typo", &plan).unwrap();
        assert_eq!(imported.unresolved_ingredients, vec!["Kipfilett".to_string()]);

        let lenient = generate_dynamic_plan(&db, table, &request(Some("u"), Some("typo"))).unwrap();
        assert!(lenient.warnings.unresolved_ingredients.contains("Kipfilett"));
        let lunch = lenient.week_plan.get("maandag").unwrap().meals.get(MealType::Lunch).unwrap();
        assert_eq!(lunch[1].calories, 0.0);
        assert_eq!(lunch[1].protein, 0.0);

        let mut strict = request(Some("u"), Some("typo"));
        strict.strict_ingredients = true;
        let err = generate_dynamic_plan(&db, table, &strict).unwrap_err();
        assert!(matches!(err, PlanError::UnresolvedIngredients(ref names) if names == &vec!["Kipfilett".to_string()]));
    }

    #[test]
    fn test_import_rejects_invalid_plans() {
        let db = database();
        let table = ingredient_table();
        let negative = json!({"maandag": {"lunch": [{"name": "Rijst", "amount": -5}]}});
        assert!(matches!(
            import_meal_plan(&db, table, "x", "X", &negative),
            Err(PlanError::InvalidInput(_))
        ));
        assert!(matches!(
            import_meal_plan(&db, table, "x", "X", &json!({"maandag": {}})),
            Err(PlanError::NoMealData(_))
        ));
        assert!(matches!(
            import_meal_plan(&db, table, " ", "X", &template()),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_list_and_delete() {
        let db = database();
        let table = ingredient_table();
        import_meal_plan(&db, table, "basis", "Basis", &template()).unwrap();
        db.with_conn(|conn| MealPlanTemplate::insert_raw(conn, "kapot", "Kapot", "nope")).unwrap();

        let list = list_meal_plans(&db, table).unwrap();
        assert_eq!(list.len(), 2);
        let basis = list.iter().find(|p| p.plan_id == "basis").unwrap();
        assert_eq!(basis.day_count, 2);
        assert_eq!(basis.base_plan_calories, Some(1581.0));
        let kapot = list.iter().find(|p| p.plan_id == "kapot").unwrap();
        assert_eq!(kapot.base_plan_calories, None);

        assert!(delete_meal_plan(&db, "basis").unwrap());
        assert!(!delete_meal_plan(&db, "basis").unwrap());
    }
}
