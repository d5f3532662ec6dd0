//! Use-case services.
//!
//! Callers go through services so they stay independent of storage details.

pub mod employee_service;
