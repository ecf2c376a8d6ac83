//! Service operations
//!
//! Shared by the HTTP routes, the MCP tools, and the admin binaries.

pub mod plans;
pub mod profiles;
pub mod status;
