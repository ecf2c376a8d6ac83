use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::build_info;
use crate::error::PlanResult;
use crate::tools::plans::{self, DynamicPlan, DynamicPlanRequest, MealPlanSummary};

/// Success envelope; failures are rendered by `PlanError`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Query string of the plan endpoint
///
/// Everything is optional here so a missing or empty value reaches the
/// handler and gets the JSON error body instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub user_id: Option<String>,
    pub plan_id: Option<String>,
    pub strict_ingredients: Option<String>,
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes") => true,
        Some(v) if matches!(v.as_str(), "false" | "0" | "no") => false,
        _ => default,
    }
}

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": build_info::VERSION,
        "buildNumber": build_info::BUILD_NUMBER,
    }))
}

pub(super) async fn nutrition_plan_dynamic(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> PlanResult<Json<ApiResponse<DynamicPlan>>> {
    let request = DynamicPlanRequest {
        strict_ingredients: parse_flag(
            query.strict_ingredients.as_deref(),
            state.strict_ingredients,
        ),
        user_id: query.user_id,
        plan_id: query.plan_id,
    };

    let plan = tokio::task::spawn_blocking(move || {
        plans::generate_dynamic_plan(&state.db, state.table, &request)
    })
    .await??;

    Ok(Json(ApiResponse::ok(plan)))
}

pub(super) async fn meal_plans(
    State(state): State<AppState>,
) -> PlanResult<Json<ApiResponse<Vec<MealPlanSummary>>>> {
    let list =
        tokio::task::spawn_blocking(move || plans::list_meal_plans(&state.db, state.table))
            .await??;

    Ok(Json(ApiResponse::ok(list)))
}
