//! # API Shared
//!
//! Shared definitions for the CMS HTTP API.
//!
//! Contains:
//! - Request and response bodies (`types` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//! - Bearer token checking
//!
//! Used by `api-rest` and the workspace's main binary.

pub mod auth;
pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
