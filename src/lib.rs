pub mod api; // HTTP surface: router, handlers, middleware
pub mod auth; // Password hashing + token generation
pub mod authorization; // Capability gate between identity and data
pub mod config;
pub mod db;
pub mod models;
pub mod predictor; // Scoring-service port + HTTP adapter
pub mod screening; // Encoding, risk banding, orchestration
