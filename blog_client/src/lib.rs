//! Typed client for the blog REST API with query caching.

pub mod api;
pub mod cache;
pub mod error;
pub mod models;
pub mod routes;

pub use api::BlogClient;
pub use cache::{QueryCache, QueryKey};
pub use error::{ClientError, ClientResult};
