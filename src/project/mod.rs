//! Project and task tracking for Gantt.
//!
//! This module implements the tracking engine core: project and task
//! records with their status lifecycle, a storage-agnostic repository
//! contract with in-memory and `PostgreSQL` implementations, the
//! business-rule service consumed by the console and the maintenance job,
//! and the overdue-task auto-close sweep. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
