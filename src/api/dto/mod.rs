//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs derive `Deserialize` and `Validate`; response DTOs are built
//! from domain entities.

pub mod auth;
pub mod health;
pub mod urls;
