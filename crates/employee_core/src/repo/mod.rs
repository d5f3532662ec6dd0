//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the employee data-access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Employee::validate()` before persistence.
//! - Lookups report "no match" as `Ok(None)`, never as an error.

pub mod employee_repo;
