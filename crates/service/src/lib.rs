//! Validation & orchestration for the employee directory.
//!
//! Every mutation is checked here before it reaches the repository. Errors
//! coming back from the repository are passed through unchanged inside
//! [`ServiceError::Repository`].

pub mod employees;
pub mod error;
pub mod validation;

pub use employees::EmployeeService;
pub use error::{ServiceError, ValidationError};
pub use validation::{MAX_SEARCH_QUERY_CHARS, MIN_SEARCH_QUERY_CHARS};
