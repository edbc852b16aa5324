//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /cache/stats` - Cache size, capacity, ordered keys and counters
//! - `GET /cache/:key` - Retrieve a value by key
//! - `PUT /cache/:key` - Create or update a key
//! - `DELETE /cache/:key` - Delete a key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
