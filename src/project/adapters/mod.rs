//! Persistence adapters for the project module.
//!
//! Concrete implementations of the [`ProjectRepository`] port. Adapters
//! handle all infrastructure concerns while the domain remains pure.
//!
//! - [`memory::InMemoryProjectRepository`]: owned in-process storage, the
//!   reference implementation for correctness testing
//! - [`postgres::PostgresProjectRepository`]: durable `PostgreSQL`
//!   persistence using Diesel
//!
//! [`ProjectRepository`]: crate::project::ports::ProjectRepository

pub mod memory;
pub mod postgres;
