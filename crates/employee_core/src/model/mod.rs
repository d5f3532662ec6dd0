//! Domain model for the employee store.
//!
//! # Invariants
//! - Employee identifiers are assigned by storage, never by callers.
//! - Deletion is a hard delete; there are no tombstones.

pub mod employee;
