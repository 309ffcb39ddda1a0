//! # Folio Core
//!
//! The domain layer of the Folio content backend: entities, listing filters,
//! payload validation, repository ports and the services built on them.
//! Nothing in this crate talks to a database directly.

pub mod domain;
pub mod error;
pub mod filter;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use filter::PostFilter;
pub use services::{AuthorService, PostService, TagService};
