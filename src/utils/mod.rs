//! Helpers shared by the services.
//!
//! - [`alias`] - alias generation and validation
//! - [`url_normalizer`] - canonical form for link targets
//! - [`password`] - Argon2id hashing

pub mod alias;
pub mod password;
pub mod url_normalizer;
