//! Domain types shared by every layer of the employee directory.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Field;
pub use structs::{Employee, EmployeeStats, NewEmployee};
