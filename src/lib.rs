//! Gantt: project and task tracking engine.
//!
//! This crate provides the core of a task tracker: projects, the tasks
//! nested within them, the business rules that govern both, and an
//! overdue-task auto-close maintenance sweep. Persistence is pluggable
//! behind a repository contract with in-memory and `PostgreSQL`
//! implementations selected at process startup.
//!
//! # Architecture
//!
//! Gantt follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business entities with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory, database)
//! - **Services**: Business-rule orchestration over the ports
//!
//! # Modules
//!
//! - [`config`]: Process-environment configuration
//! - [`project`]: Projects, tasks, repositories, and the tracking service

pub mod config;
pub mod project;
