//! FitVeda Library
//!
//! Workout, meal, water and body measurement tracking behind an MCP server.

pub mod ai;
pub mod build_info;
pub mod config;
pub mod db;
pub mod engine;
pub mod mcp;
pub mod models;
pub mod store;
pub mod tools;
