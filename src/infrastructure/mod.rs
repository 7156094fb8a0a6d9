//! Infrastructure layer implementing the domain store contracts.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL store, used in production
//! - [`memory`] - in-memory store, used by tests and local experiments

pub mod memory;
pub mod persistence;
