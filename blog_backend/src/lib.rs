pub mod api;
pub mod auth;
pub mod blog;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod database;
pub mod node;
pub mod schema;
pub mod telemetry;
pub mod utils;
