//! Employee use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, RepoResult};

/// Use-case service wrapper for employee records.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new employee and returns it with its assigned id.
    pub fn hire(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<Employee> {
        self.repo.save(&Employee::new(first_name, last_name, email))
    }

    /// Saves changes made to a previously stored employee.
    ///
    /// # Errors
    /// - `RepoError::Unsaved` when `employee` has never been saved.
    /// - `RepoError::NotFound` when the stored row was removed meanwhile.
    pub fn update_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        if !employee.is_persisted() {
            return Err(RepoError::Unsaved);
        }
        self.repo.save(employee)
    }

    pub fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.find_by_id(id)
    }

    pub fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        self.repo.find_all()
    }

    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        self.repo.find_by_email(email)
    }

    /// Looks up an employee by exact first and last name.
    pub fn find_by_name(&self, first_name: &str, last_name: &str) -> RepoResult<Option<Employee>> {
        self.repo.find_by_name_named(first_name, last_name)
    }

    /// Removes an employee. Unknown ids are ignored.
    pub fn remove_employee(&self, id: EmployeeId) -> RepoResult<()> {
        self.repo.delete_by_id(id)
    }

    /// Number of stored employees.
    pub fn headcount(&self) -> RepoResult<u64> {
        self.repo.count()
    }
}
