//! Host registry module.
//!
//! Persists the monitored host list as a single JSON document and provides
//! CRUD operations keyed by IP address.

mod models;
mod repository;
mod store;

pub use models::*;
pub use repository::*;
pub use store::*;
