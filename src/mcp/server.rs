//! MCP server implementation
//!
//! Exposes the plan and profile operations as MCP tools over stdio.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::error::PlanError;
use crate::models::NutritionProfileUpsert;
use crate::nutrition::{ingredient_table, IngredientTable};
use crate::tools::plans::{self, DynamicPlanRequest};
use crate::tools::profiles;
use crate::tools::status::StatusTracker;

/// Nutrition plan MCP service
#[derive(Clone)]
pub struct NutritionService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    table: &'static IngredientTable,
    strict_ingredients: bool,
    tool_router: ToolRouter<NutritionService>,
}

impl NutritionService {
    pub fn new(database_path: PathBuf, database: Database, strict_ingredients: bool) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            table: ingredient_table(),
            strict_ingredients,
            tool_router: Self::tool_router(),
        }
    }
}

/// Client mistakes become invalid-params errors, everything else internal
fn tool_error(e: PlanError) -> McpError {
    if e.status().is_client_error() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateNutritionPlanParams {
    /// Member whose calorie target is used
    pub user_id: String,
    /// Stored template to scale
    pub plan_id: String,
    /// Fail when the template names ingredients missing from the table
    pub strict_ingredients: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportMealPlanParams {
    pub plan_id: String,
    pub name: String,
    /// Weekly plan object: day name -> meals -> ingredient list
    pub week_plan: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealPlanParams {
    pub plan_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetNutritionProfileParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteNutritionProfileParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetNutritionProfileParams {
    pub user_id: String,
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_carbs: f64,
    pub target_fat: f64,
    pub age: Option<u32>,
    /// Body weight in kg
    pub weight: Option<f64>,
    /// Height in cm
    pub height: Option<f64>,
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupIngredientParams {
    /// Exact, case-sensitive name; omit to list the whole table
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
    plan_id: String,
}

#[derive(Debug, Serialize)]
struct DeleteProfileResponse {
    success: bool,
    user_id: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutritionService {
    // --- Status ---

    #[tool(description = "Get the current status of the nutrition service including build info, database status, and process information")]
    async fn service_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for the meal plan workflow: template format, units, and scaling rules. Call this before importing plans or generating member plans.")]
    fn plan_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLAN_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLAN_INSTRUCTIONS)]))
    }

    // --- Plans ---

    #[tool(description = "Scale a stored meal plan template to a member's daily calorie target. Returns the scaled week, daily and weekly macro totals, and scaling info.")]
    fn generate_nutrition_plan(&self, Parameters(p): Parameters<GenerateNutritionPlanParams>) -> Result<CallToolResult, McpError> {
        let request = DynamicPlanRequest {
            user_id: Some(p.user_id),
            plan_id: Some(p.plan_id),
            strict_ingredients: p.strict_ingredients.unwrap_or(self.strict_ingredients),
        };
        let result = plans::generate_dynamic_plan(&self.database, self.table, &request).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List stored meal plan templates with day count and base calories")]
    fn list_meal_plans(&self) -> Result<CallToolResult, McpError> {
        let result = plans::list_meal_plans(&self.database, self.table).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Create or replace a meal plan template. Reports ingredients missing from the ingredient table.")]
    fn import_meal_plan(&self, Parameters(p): Parameters<ImportMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = plans::import_meal_plan(&self.database, self.table, &p.plan_id, &p.name, &p.week_plan)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal plan template")]
    fn delete_meal_plan(&self, Parameters(p): Parameters<DeleteMealPlanParams>) -> Result<CallToolResult, McpError> {
        let deleted = plans::delete_meal_plan(&self.database, &p.plan_id).map_err(tool_error)?;
        if !deleted {
            return Err(tool_error(PlanError::PlanNotFound(p.plan_id)));
        }
        json_result(&DeleteResponse { success: true, plan_id: p.plan_id })
    }

    // --- Profiles ---

    #[tool(description = "Get a member's nutrition targets. Members without a stored profile get the fallback targets, marked with profileSource 'fallback'.")]
    fn get_nutrition_profile(&self, Parameters(p): Parameters<GetNutritionProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, &p.user_id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Create or replace a member's daily calorie and macro targets")]
    fn set_nutrition_profile(&self, Parameters(p): Parameters<SetNutritionProfileParams>) -> Result<CallToolResult, McpError> {
        let data = NutritionProfileUpsert {
            target_calories: p.target_calories, target_protein: p.target_protein,
            target_carbs: p.target_carbs, target_fat: p.target_fat,
            age: p.age, weight: p.weight, height: p.height, goal: p.goal,
        };
        let result = profiles::set_profile(&self.database, &p.user_id, &data).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a member's stored nutrition profile. The member falls back to the default targets afterwards.")]
    fn delete_nutrition_profile(&self, Parameters(p): Parameters<DeleteNutritionProfileParams>) -> Result<CallToolResult, McpError> {
        let deleted = profiles::delete_profile(&self.database, &p.user_id).map_err(tool_error)?;
        if !deleted {
            return Err(tool_error(PlanError::InvalidInput(format!("No stored profile for {}", p.user_id))));
        }
        json_result(&DeleteProfileResponse { success: true, user_id: p.user_id })
    }

    // --- Ingredients ---

    #[tool(description = "Look up an ingredient's nutrition values and basis (per 100 g/ml or per unit). Omit name to list the full table.")]
    fn lookup_ingredient(&self, Parameters(p): Parameters<LookupIngredientParams>) -> Result<CallToolResult, McpError> {
        match p.name {
            Some(name) => {
                let entry = profiles::lookup_ingredient(self.table, &name).map_err(tool_error)?;
                json_result(entry)
            }
            None => json_result(&self.table.entries()),
        }
    }
}

#[tool_handler]
impl ServerHandler for NutritionService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ttm-nutrition".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Top Tier Men Nutrition".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Top Tier Men nutrition plan scaler. \
                 Call plan_instructions first for the template format and scaling rules. \
                 Plans: generate_nutrition_plan, list_meal_plans, import_meal_plan, delete_meal_plan. \
                 Profiles: get_nutrition_profile, set_nutrition_profile, delete_nutrition_profile. \
                 Ingredients: lookup_ingredient. Status: service_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_tool_error_mapping() {
        let not_found = tool_error(PlanError::PlanNotFound("x".into()));
        assert_eq!(not_found.code, McpError::invalid_params("", None).code);

        let internal = tool_error(PlanError::Internal("boom".into()));
        assert_eq!(internal.code, McpError::internal_error("", None).code);
    }

    #[test]
    fn test_service_info() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        let service = NutritionService::new(PathBuf::from(":memory:"), db, false);
        let info = service.get_info();
        assert_eq!(info.server_info.name, "ttm-nutrition");
        assert!(info.instructions.unwrap().contains("generate_nutrition_plan"));
    }
}
