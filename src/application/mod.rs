//! Application layer services implementing business logic.
//!
//! Services talk to the store only through the [`crate::domain::store::Store`]
//! facade and return [`crate::error::AppError`] to the HTTP layer.
//!
//! # Available Services
//!
//! - [`services::auth_resource::AuthResource`] - registration, login, bearer tokens
//! - [`services::link_service::LinkService`] - short URL creation and management

pub mod services;
