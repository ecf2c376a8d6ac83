//! MCP transport

mod server;

pub use server::NutritionService;
