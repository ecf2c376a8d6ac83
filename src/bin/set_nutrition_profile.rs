//! Utility to set a member's nutrition targets
//!
//! Usage: set_nutrition_profile <user_id> <kcal> <protein> <carbs> <fat> [goal]

use ttm_nutrition::models::NutritionProfileUpsert;
use ttm_nutrition::tools::profiles;

const USAGE: &str = "Usage: set_nutrition_profile <user_id> <kcal> <protein> <carbs> <fat> [goal]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 || args.len() > 6 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let data = NutritionProfileUpsert {
        target_calories: args[1].parse()?,
        target_protein: args[2].parse()?,
        target_carbs: args[3].parse()?,
        target_fat: args[4].parse()?,
        age: None,
        weight: None,
        height: None,
        goal: args.get(5).cloned(),
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

    let profile = profiles::set_profile(&database, &args[0], &data)?;
    println!("Nutrition profile set:");
    println!("  User: {}", profile.user_id);
    println!("  Calories: {} kcal", profile.target_calories);
    println!(
        "  Protein/Carbs/Fat: {} g / {} g / {} g",
        profile.target_protein, profile.target_carbs, profile.target_fat
    );
    if let Some(goal) = &profile.goal {
        println!("  Goal: {}", goal);
    }

    Ok(())
}
