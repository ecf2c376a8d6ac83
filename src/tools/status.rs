//! Service status
//!
//! Runtime status information and the plan workflow guide served over MCP.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::nutrition::ingredient_table;

/// Plan workflow instructions for AI assistants
pub const PLAN_INSTRUCTIONS: &str = r#"
# Top Tier Men Meal Plan Instructions

## Overview

A member's plan is produced from two stored pieces:
1. **Nutrition profile** - daily calorie and macro targets per user id
2. **Meal plan template** - an unscaled week of meals per plan id

`generate_nutrition_plan` scales every ingredient amount of the template so
the average day lands on the member's calorie target.

## Template Format

```json
{
  "maandag": {
    "ontbijt": [{"name": "Havermout", "amount": 80, "unit": "gram"}],
    "lunch": [{"name": "Ei", "amount": 2, "unit": "stuks"}],
    "diner": [{"name": "Kipfilet", "amount": 200}],
    "dailyTotals": {"calories": 2150}
  }
}
```

- Meals: `ontbijt`, `lunch`, `lunch_snack`, `avond_snack`, `diner`
- Units: `gram` (default), `ml`, `stuks`, `portie`, `sneden`
- `dailyTotals.calories` is optional; when present it is used as the day's base calories
- Ingredient names must match the ingredient table exactly (`lookup_ingredient`)

## Scaling Rules

- Factor = target calories / average template calories, clamped to 0.6 - 2.0
- Gram and ml amounts are rounded to steps of 5 (minimum 5)
- Piece-like units (stuks, portie, sneden) are whole numbers, minimum 1

## Workflow

1. `get_nutrition_profile` for the member; if missing, `set_nutrition_profile`
2. `list_meal_plans` to pick a template (or `import_meal_plan` to add one)
3. `generate_nutrition_plan` with user_id and plan_id
4. Check `warnings.unresolvedIngredients`; those ingredients count as zero
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Number of entries in the ingredient table
    pub ingredient_count: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            ingredient_count: ingredient_table().len(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
