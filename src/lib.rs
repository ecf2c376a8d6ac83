//! Top Tier Men Nutrition Library
//!
//! Scales template meal plans to a member's daily calorie target.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
