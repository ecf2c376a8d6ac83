//! Meal plan template model
//!
//! Unscaled weekly plans, stored as JSON text per plan id.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::meal_plan::WeeklyPlan;
use crate::db::{DbError, DbResult};

/// A stored template row; `week_plan` is unparsed JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanTemplate {
    pub plan_id: String,
    pub name: String,
    pub week_plan: String,
    pub created_at: String,
    pub updated_at: String,
}

impl MealPlanTemplate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            plan_id: row.get("plan_id")?,
            name: row.get("name")?,
            week_plan: row.get("week_plan")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Parse the stored JSON into a validated weekly plan
    pub fn parse_plan(&self) -> Result<WeeklyPlan, String> {
        WeeklyPlan::from_json(&self.week_plan)
    }

    pub fn get(conn: &Connection, plan_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_plans WHERE plan_id = ?1")?;
        Ok(stmt.query_row([plan_id], Self::from_row).optional()?)
    }

    /// Create or replace a template
    ///
    /// The plan is serialised from its parsed form so stored JSON is always
    /// in canonical shape.
    pub fn upsert(conn: &Connection, plan_id: &str, name: &str, plan: &WeeklyPlan) -> DbResult<Self> {
        let week_plan = serde_json::to_string(plan)
            .map_err(|e| DbError::Sqlite(rusqlite::Error::ToSqlConversionFailure(Box::new(e))))?;

        conn.execute(
            r#"
            INSERT INTO meal_plans (plan_id, name, week_plan)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(plan_id) DO UPDATE SET
                name = excluded.name,
                week_plan = excluded.week_plan,
                updated_at = datetime('now')
            "#,
            params![plan_id, name, week_plan],
        )?;

        Self::get(conn, plan_id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Store raw JSON without validation
    #[cfg(test)]
    pub(crate) fn insert_raw(conn: &Connection, plan_id: &str, name: &str, week_plan: &str) -> DbResult<()> {
        conn.execute(
            "INSERT OR REPLACE INTO meal_plans (plan_id, name, week_plan) VALUES (?1, ?2, ?3)",
            params![plan_id, name, week_plan],
        )?;
        Ok(())
    }

    /// All templates ordered by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_plans ORDER BY name, plan_id")?;
        let rows = stmt.query_map([], Self::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn delete(conn: &Connection, plan_id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_plans WHERE plan_id = ?1", [plan_id])?;
        Ok(rows > 0)
    }
}
