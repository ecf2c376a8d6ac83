//! Nutrition profile operations

use serde::Serialize;

use crate::db::Database;
use crate::error::{PlanError, PlanResult};
use crate::models::{NutritionProfile, NutritionProfileUpsert, ProfileSource};
use crate::nutrition::{IngredientNutrition, IngredientTable};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: NutritionProfile,
    pub profile_source: ProfileSource,
}

/// Stored profile, or the fallback targets marked as such
pub fn get_profile(db: &Database, user_id: &str) -> PlanResult<ProfileResponse> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(PlanError::InvalidInput("user_id cannot be empty".to_string()));
    }

    let conn = db.get_conn()?;
    let (profile, profile_source) = NutritionProfile::get_or_fallback(&conn, user_id)?;
    Ok(ProfileResponse {
        profile,
        profile_source,
    })
}

pub fn set_profile(
    db: &Database,
    user_id: &str,
    data: &NutritionProfileUpsert,
) -> PlanResult<NutritionProfile> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(PlanError::InvalidInput("user_id cannot be empty".to_string()));
    }
    data.validate().map_err(PlanError::InvalidInput)?;

    let conn = db.get_conn()?;
    let profile = NutritionProfile::upsert(&conn, user_id, data)?;
    tracing::info!(
        "Stored nutrition profile for {}: {} kcal",
        user_id,
        profile.target_calories
    );
    Ok(profile)
}

/// Remove a stored profile; returns whether one existed
pub fn delete_profile(db: &Database, user_id: &str) -> PlanResult<bool> {
    let conn = db.get_conn()?;
    let deleted = NutritionProfile::delete(&conn, user_id.trim())?;
    if deleted {
        tracing::info!("Deleted nutrition profile for {}", user_id.trim());
    }
    Ok(deleted)
}

/// Exact-name lookup in the ingredient table
pub fn lookup_ingredient<'t>(
    table: &'t IngredientTable,
    name: &str,
) -> PlanResult<&'t IngredientNutrition> {
    table
        .lookup(name)
        .ok_or_else(|| PlanError::UnresolvedIngredients(vec![name.to_string()]))
}
