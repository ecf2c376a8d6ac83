//! Top Tier Men Nutrition service
//!
//! Serves scaled meal plans over HTTP, or the same operations as MCP tools
//! on stdio.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use ttm_nutrition::config::{Config, Transport};
use ttm_nutrition::mcp::NutritionService;
use ttm_nutrition::{build_info, db, http};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ttm_nutrition=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::load()?;
    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    match config.transport {
        Transport::Http => {
            eprintln!("Starting HTTP server on {}...", config.address());
            http::serve(&config, database).await?;
        }
        Transport::Mcp => {
            eprintln!("Starting MCP server on stdio...");
            let service = NutritionService::new(db_path, database, config.strict_ingredients);
            let server = service.serve((stdin(), stdout())).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}
