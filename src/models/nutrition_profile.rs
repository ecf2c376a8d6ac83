//! Nutrition profile model
//!
//! A member's daily calorie and macro targets.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Targets used when a member has no stored profile
pub const FALLBACK_CALORIES: f64 = 2000.0;
pub const FALLBACK_PROTEIN: f64 = 150.0;
pub const FALLBACK_CARBS: f64 = 200.0;
pub const FALLBACK_FAT: f64 = 70.0;

/// Where a profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Stored,
    Fallback,
}

/// Daily targets and body data for one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionProfile {
    pub user_id: String,
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_carbs: f64,
    pub target_fat: f64,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
}

/// Data for creating or replacing a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionProfileUpsert {
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_carbs: f64,
    pub target_fat: f64,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub goal: Option<String>,
}

impl NutritionProfileUpsert {
    pub fn validate(&self) -> Result<(), String> {
        if !self.target_calories.is_finite() || self.target_calories <= 0.0 {
            return Err("target_calories must be greater than 0".to_string());
        }
        for (field, value) in [
            ("target_protein", self.target_protein),
            ("target_carbs", self.target_carbs),
            ("target_fat", self.target_fat),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} cannot be negative", field));
            }
        }
        Ok(())
    }
}

impl NutritionProfile {
    /// The default targets for a member without a stored profile
    pub fn fallback(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            target_calories: FALLBACK_CALORIES,
            target_protein: FALLBACK_PROTEIN,
            target_carbs: FALLBACK_CARBS,
            target_fat: FALLBACK_FAT,
            age: None,
            weight: None,
            height: None,
            goal: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            target_calories: row.get("target_calories")?,
            target_protein: row.get("target_protein")?,
            target_carbs: row.get("target_carbs")?,
            target_fat: row.get("target_fat")?,
            age: row.get("age")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            goal: row.get("goal")?,
        })
    }

    /// Get the stored profile for a member
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM nutrition_profiles WHERE user_id = ?1")?;
        Ok(stmt.query_row([user_id], Self::from_row).optional()?)
    }

    /// Stored profile, or the fallback targets when none exists
    pub fn get_or_fallback(conn: &Connection, user_id: &str) -> DbResult<(Self, ProfileSource)> {
        match Self::get(conn, user_id)? {
            Some(profile) => Ok((profile, ProfileSource::Stored)),
            None => {
                tracing::warn!("No nutrition profile for user {}, using fallback targets", user_id);
                Ok((Self::fallback(user_id), ProfileSource::Fallback))
            }
        }
    }

    /// Create or replace a member's profile
    pub fn upsert(conn: &Connection, user_id: &str, data: &NutritionProfileUpsert) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO nutrition_profiles (
                user_id, target_calories, target_protein, target_carbs, target_fat,
                age, weight, height, goal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(user_id) DO UPDATE SET
                target_calories = excluded.target_calories,
                target_protein = excluded.target_protein,
                target_carbs = excluded.target_carbs,
                target_fat = excluded.target_fat,
                age = excluded.age,
                weight = excluded.weight,
                height = excluded.height,
                goal = excluded.goal,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                data.target_calories,
                data.target_protein,
                data.target_carbs,
                data.target_fat,
                data.age,
                data.weight,
                data.height,
                data.goal,
            ],
        )?;

        Self::get(conn, user_id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Delete a profile; returns whether a row was removed
    pub fn delete(conn: &Connection, user_id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM nutrition_profiles WHERE user_id = ?1", [user_id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn upsert_data(calories: f64) -> NutritionProfileUpsert {
        NutritionProfileUpsert {
            target_calories: calories,
            target_protein: 180.0,
            target_carbs: 300.0,
            target_fat: 80.0,
            age: Some(34),
            weight: Some(86.5),
            height: Some(183.0),
            goal: Some("spieropbouw".to_string()),
        }
    }

    #[test]
    fn test_fallback_when_missing() {
        let conn = conn();
        let (profile, source) = NutritionProfile::get_or_fallback(&conn, "u-1").unwrap();
        assert_eq!(source, ProfileSource::Fallback);
        assert_eq!(profile.target_calories, 2000.0);
        assert_eq!(profile.target_protein, 150.0);
        assert_eq!(profile.target_carbs, 200.0);
        assert_eq!(profile.target_fat, 70.0);
        assert!(profile.goal.is_none());
    }

    #[test]
    fn test_upsert_then_update() {
        let conn = conn();
        let created = NutritionProfile::upsert(&conn, "u-1", &upsert_data(2800.0)).unwrap();
        assert_eq!(created.target_calories, 2800.0);
        assert_eq!(created.age, Some(34));

        let updated = NutritionProfile::upsert(&conn, "u-1", &upsert_data(3100.0)).unwrap();
        assert_eq!(updated.target_calories, 3100.0);

        let (profile, source) = NutritionProfile::get_or_fallback(&conn, "u-1").unwrap();
        assert_eq!(source, ProfileSource::Stored);
        assert_eq!(profile, updated);
    }

    #[test]
    fn test_delete() {
        let conn = conn();
        NutritionProfile::upsert(&conn, "u-1", &upsert_data(2500.0)).unwrap();
        assert!(NutritionProfile::delete(&conn, "u-1").unwrap());
        assert!(!NutritionProfile::delete(&conn, "u-1").unwrap());
    }

    #[test]
    fn test_validate() {
        assert!(upsert_data(2500.0).validate().is_ok());
        assert!(upsert_data(0.0).validate().is_err());
        let mut negative = upsert_data(2500.0);
        negative.target_fat = -1.0;
        assert!(negative.validate().unwrap_err().contains("target_fat"));
    }
}
