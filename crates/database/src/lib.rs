//! # Employer Database Crate
//!
//! This crate is the Record Access layer: the only place that knows the
//! `employees` table exists. It is the system's source of truth.
//!
//! ## Architectural Principles
//!
//! - **Adapter behind a trait:** Callers depend on [`EmployeeRepository`]. The
//!   PostgreSQL implementation ([`DbRepository`]) and the in-memory double
//!   ([`memory::InMemoryRepository`], behind the `test-support` feature) are
//!   interchangeable.
//! - **Structured errors:** absence is reported as [`DbError::NotFound`] and
//!   store-enforced rules as [`DbError::ConstraintViolation`], classified from
//!   row counts and SQLSTATE codes rather than message text.
//! - **Asynchronous & Pooled:** All operations are asynchronous over a shared
//!   `PgPool`. Dropping an operation's future cancels the query.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies the embedded schema migrations.
//! - `EmployeeRepository` / `DbRepository`: the data access contract and its SQL implementation.
//! - `search`: query normalisation and ranking rules.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod repository;
pub mod search;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::{DbError, NotFoundKey};
pub use repository::{DbRepository, EmployeeRepository, PHONE_UNIQUE_CONSTRAINT};
pub use search::SEARCH_RESULT_LIMIT;
