//! Request-level errors
//!
//! Every failure of the plan endpoints maps to one variant, which decides
//! the HTTP status and the `{ success: false, error }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Missing required parameters: userId and planId are required (missing: {})", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    #[error("Meal plan not found: {0}")]
    PlanNotFound(String),

    #[error("Meal plan {0} has no meal data")]
    NoMealData(String),

    #[error("Unknown ingredients in plan: {}", .0.join(", "))]
    UnresolvedIngredients(Vec<String>),

    #[error("Malformed meal plan {plan_id}: {reason}")]
    MalformedPlan { plan_id: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PlanResult<T> = Result<T, PlanError>;

impl PlanError {
    pub fn status(&self) -> StatusCode {
        match self {
            PlanError::MissingParameters(_) => StatusCode::BAD_REQUEST,
            PlanError::NoMealData(_) => StatusCode::BAD_REQUEST,
            PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlanError::PlanNotFound(_) => StatusCode::NOT_FOUND,
            PlanError::UnresolvedIngredients(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlanError::MalformedPlan { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            PlanError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for PlanError {
    fn from(e: tokio::task::JoinError) -> Self {
        PlanError::Internal(e.to_string())
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = json!({
            "success": false,
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
