//! MCP tool handlers for the OmniFocus server
//!
//! Each file turns raw tool arguments into connector calls for one entity
//! kind and renders the result as JSON.

pub mod folders;
pub mod perspectives;
pub mod projects;
pub mod tags;
pub mod tasks;
