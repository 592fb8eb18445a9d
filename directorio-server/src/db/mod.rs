//! Database layer - connection pool, migrations and repositories
//!
//! # Design Principles
//!
//! - Every read carries an explicit `deleted_at IS NULL` predicate
//! - Person reads attach their area through a JOIN - no N+1 queries
//! - Unique indexes and the area foreign key are the final word on
//!   duplicates; callers may pre-check but must handle violations

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use memory::MemoryStore;
pub use pool::{connect_with_retry, RetryPolicy};
pub use repos::*;
pub use sqlx::PgPool;
