//! Profiles
//!
//! Read-only view of user profiles, used to address orders.

pub mod errors;
mod repository;
pub mod service;

pub use errors::ProfilesServiceError;
pub use service::*;
