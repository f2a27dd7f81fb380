//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the repository ports
//! backed by PostgreSQL via Diesel with async support through `diesel-async`
//! and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak into the domain.
//! - **Strongly typed errors**: database failures map to the port error of
//!   each repository.

mod diesel_error_mapping;
mod diesel_scan_repository;
mod diesel_usage_stats_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_scan_repository::DieselScanRepository;
pub use diesel_usage_stats_repository::DieselUsageStatsRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
