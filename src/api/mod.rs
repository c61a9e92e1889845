//! API Module
//!
//! HTTP handlers and routing for the cache operations surface.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value
//! - `GET /get/*key` - Retrieve a value by key
//! - `DELETE /del/*key` - Delete a key from both tiers
//! - `DELETE /prefix/*pattern` - Delete every key with a prefix
//! - `POST /clear` - Empty both tiers
//! - `POST /invalidate/category/:id` - Category invalidation
//! - `POST /invalidate/search` - Search-query invalidation
//! - `POST /invalidate/policy/:type/:marketplace` - Policy invalidation
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
