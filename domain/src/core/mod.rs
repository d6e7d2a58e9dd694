//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`] — a validated user query
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod query;
