//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Each comes with a separate input
//! struct for creation and a patch struct for partial updates:
//!
//! - [`User`] / [`NewUser`] / [`UserPatch`]
//! - [`ShortUrl`] / [`NewShortUrl`] / [`UrlPatch`]

pub mod short_url;
pub mod user;

pub use short_url::{NewShortUrl, ShortUrl, UrlPatch};
pub use user::{NewUser, User, UserPatch, normalize_email};
