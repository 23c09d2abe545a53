//! # HM-04: Admin API
//!
//! REST administrative surface over the channel registry, lifecycle manager
//! and routing engine.
//!
//! ## Endpoints
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/channels` | 200, filtered by caller |
//! | POST | `/channels` | 201 |
//! | GET | `/channels/:id` | 200 |
//! | PUT | `/channels/:id` | 200 |
//! | DELETE | `/channels/:id` | 200, soft or hard |
//! | GET | `/channels/:id/audits` | 200, newest first |
//! | POST | `/channels/:id/trigger` | 200 |
//!
//! ## Middleware Stack
//!
//! ```text
//! Trace → Timeout → Authenticate (bearer token) → handler
//! ```

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod service;

pub use adapters::StaticTokenResolver;
pub use domain::{AdminApiError, ApiConfig, ApiResult, AuthConfig, ConfigError, StaticUser};
pub use handlers::AppState;
pub use ports::IdentityResolver;
pub use router::build_router;
pub use service::AdminApiServer;
