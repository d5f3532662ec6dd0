//! Employee domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the store.
//! - Validate field shape before writes and after reads.
//!
//! # Invariants
//! - `id` is `None` until the first successful save and is never reassigned.
//! - `first_name`, `last_name` and `email` are non-blank.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Storage-assigned employee identifier.
pub type EmployeeId = i64;

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// Named field is empty or whitespace only.
    BlankField(&'static str),
    /// Email does not look like `local@domain.tld` or carries whitespace.
    InvalidEmail(String),
    /// Identifier loaded or supplied is not positive.
    NonPositiveId(EmployeeId),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "employee {field} must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid employee email `{value}`"),
            Self::NonPositiveId(id) => write!(f, "employee id must be positive, got {id}"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// A persisted employee record.
///
/// Name and email fields are public so callers can edit a loaded copy in
/// place and save it again. The identifier is only readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Employee {
    /// Creates an unsaved employee.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Rebuilds a stored employee. Only the repository layer hands out ids.
    pub(crate) fn stored(
        id: EmployeeId,
        first_name: String,
        last_name: String,
        email: String,
    ) -> Self {
        Self {
            id: Some(id),
            first_name,
            last_name,
            email,
        }
    }

    /// Storage identifier, `None` before the first save.
    pub fn id(&self) -> Option<EmployeeId> {
        self.id
    }

    /// Returns whether this employee has been persisted at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks field invariants.
    ///
    /// # Errors
    /// - `BlankField` for the first blank field in declaration order.
    /// - `InvalidEmail` when the email has no `local@domain.tld` shape or is
    ///   padded with whitespace.
    /// - `NonPositiveId` when a present id is zero or negative.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(EmployeeValidationError::NonPositiveId(id));
            }
        }

        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(EmployeeValidationError::BlankField(field));
            }
        }

        // Surrounding whitespace is rejected, not trimmed.
        if !EMAIL_RE.is_match(&self.email) {
            return Err(EmployeeValidationError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }
}
