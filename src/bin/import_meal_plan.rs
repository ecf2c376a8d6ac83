//! Utility to import a meal plan template from a JSON file
//!
//! Usage: import_meal_plan <plan_id> <plan_name> <file.json>

use ttm_nutrition::nutrition::ingredient_table;
use ttm_nutrition::tools::plans;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [plan_id, name, file] = args.as_slice() else {
        eprintln!("Usage: import_meal_plan <plan_id> <plan_name> <file.json>");
        std::process::exit(2);
    };

    let db_path = ttm_nutrition::config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = ttm_nutrition::db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        ttm_nutrition::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let contents = std::fs::read_to_string(file)?;
    let week_plan: serde_json::Value = serde_json::from_str(&contents)?;

    let imported = plans::import_meal_plan(&database, ingredient_table(), plan_id, name, &week_plan)?;
    println!("Meal plan imported:");
    println!("  Id: {}", imported.plan_id);
    println!("  Name: {}", imported.name);
    println!("  Days: {}", imported.day_count);
    match imported.base_plan_calories {
        Some(kcal) => println!("  Base calories: {} kcal/day", kcal),
        None => println!("  Base calories: n/a"),
    }
    if !imported.unresolved_ingredients.is_empty() {
        println!("  Unknown ingredients (counted as 0 kcal):");
        for name in &imported.unresolved_ingredients {
            println!("    - {}", name);
        }
    }

    Ok(())
}
