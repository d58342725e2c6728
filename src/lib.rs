pub mod config;
pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Page size used when `limit` is absent or malformed.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Upper bound for `limit`. Larger values are clamped.
pub const MAX_PAGE_SIZE: usize = 100;
