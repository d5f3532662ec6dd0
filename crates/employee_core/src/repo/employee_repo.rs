//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/find/delete APIs over the `employees` table.
//! - Offer the first+last name lookup with both positional (`?1`) and named
//!   (`:first_name`) parameter binding.
//!
//! # Invariants
//! - `save` inserts when the employee has no id and updates otherwise.
//! - Identifiers come from SQLite `AUTOINCREMENT` and are never reused.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Log lines carry ids and row counts only, never names or emails.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError};
use log::{debug, warn};
use rusqlite::{named_params, params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email
FROM employees";

const EMPLOYEE_COLUMNS: [&str; 4] = ["id", "first_name", "last_name", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Employee failed field validation before a write.
    Validation(EmployeeValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Update targeted an identifier with no stored row.
    NotFound(EmployeeId),
    /// Write rejected by a storage constraint, e.g. a duplicate email.
    ConstraintViolation(String),
    /// Name lookup matched more than one row.
    AmbiguousResult {
        first_name: String,
        last_name: String,
        matches: usize,
    },
    /// Operation requires an employee that has been saved before.
    Unsaved,
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a valid employee.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::ConstraintViolation(message) => {
                write!(f, "employee write violates a constraint: {message}")
            }
            Self::AmbiguousResult {
                first_name,
                last_name,
                matches,
            } => write!(
                f,
                "expected at most one employee named `{first_name} {last_name}`, found {matches}"
            ),
            Self::Unsaved => write!(f, "employee has not been saved yet"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "employee repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "employee repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "employee repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for employees.
pub trait EmployeeRepository {
    /// Inserts a new employee or updates an existing one, returning the
    /// stored copy with its identifier populated.
    fn save(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Saves every employee atomically; one failure rolls back all of them.
    fn save_all(&self, employees: &[Employee]) -> RepoResult<Vec<Employee>>;
    /// Gets one employee by id.
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Lists every employee ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
    /// Number of stored employees.
    fn count(&self) -> RepoResult<u64>;
    /// Whether a row with `id` exists.
    fn exists_by_id(&self, id: EmployeeId) -> RepoResult<bool>;
    /// Removes one employee. Missing ids are not an error.
    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()>;
    /// Removes the given employee. Unsaved employees are ignored.
    fn delete(&self, employee: &Employee) -> RepoResult<()>;
    /// Gets one employee by email. `email` is UNIQUE, so at most one row matches.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    /// Name lookup using positional parameters.
    fn find_by_name_indexed(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>>;
    /// Name lookup using named parameters. Same results as the indexed form.
    fn find_by_name_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn save(&self, employee: &Employee) -> RepoResult<Employee> {
        save_with(self.conn, employee)
    }

    fn save_all(&self, employees: &[Employee]) -> RepoResult<Vec<Employee>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(employees.len());
        for employee in employees {
            saved.push(save_with(&tx, employee)?);
        }
        tx.commit()?;

        debug!(
            "event=employee_save_all module=repo status=ok count={}",
            saved.len()
        );
        Ok(saved)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative employee count {count}")))
    }

    fn exists_by_id(&self, id: EmployeeId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        debug!("event=employee_delete module=repo status=ok id={id} removed={removed}");
        Ok(())
    }

    fn delete(&self, employee: &Employee) -> RepoResult<()> {
        match employee.id() {
            Some(id) => self.delete_by_id(id),
            None => Ok(()),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let columns = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE email = ?1;"),
                [email],
                read_employee_columns,
            )
            .optional()?;

        columns.map(into_valid_employee).transpose()
    }

    fn find_by_name_indexed(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE first_name = ?1
               AND last_name = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![first_name, last_name])?;
        let mut matches = Vec::new();
        while let Some(row) = rows.next()? {
            matches.push(parse_employee_row(row)?);
        }

        single_name_match(first_name, last_name, matches)
    }

    fn find_by_name_named(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE first_name = :first_name
               AND last_name = :last_name
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(named_params! {
            ":first_name": first_name,
            ":last_name": last_name,
        })?;
        let mut matches = Vec::new();
        while let Some(row) = rows.next()? {
            matches.push(parse_employee_row(row)?);
        }

        single_name_match(first_name, last_name, matches)
    }
}

fn save_with(conn: &Connection, employee: &Employee) -> RepoResult<Employee> {
    employee.validate()?;

    match employee.id() {
        None => {
            conn.execute(
                "INSERT INTO employees (
                    first_name,
                    last_name,
                    email
                ) VALUES (?1, ?2, ?3);",
                params![
                    employee.first_name.as_str(),
                    employee.last_name.as_str(),
                    employee.email.as_str(),
                ],
            )
            .map_err(write_error)?;

            let id = conn.last_insert_rowid();
            debug!("event=employee_save module=repo status=ok op=insert id={id}");
            Ok(Employee::stored(
                id,
                employee.first_name.clone(),
                employee.last_name.clone(),
                employee.email.clone(),
            ))
        }
        Some(id) => {
            let changed = conn
                .execute(
                    "UPDATE employees
                     SET
                        first_name = ?1,
                        last_name = ?2,
                        email = ?3
                     WHERE id = ?4;",
                    params![
                        employee.first_name.as_str(),
                        employee.last_name.as_str(),
                        employee.email.as_str(),
                        id,
                    ],
                )
                .map_err(write_error)?;

            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }

            debug!("event=employee_save module=repo status=ok op=update id={id}");
            Ok(employee.clone())
        }
    }
}

fn write_error(err: rusqlite::Error) -> RepoError {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            warn!(
                "event=employee_save module=repo status=error error_code=constraint_violation extended_code={}",
                failure.extended_code
            );
            RepoError::ConstraintViolation(message.unwrap_or_else(|| failure.to_string()))
        }
        other => other.into(),
    }
}

fn single_name_match(
    first_name: &str,
    last_name: &str,
    mut matches: Vec<Employee>,
) -> RepoResult<Option<Employee>> {
    if matches.len() > 1 {
        return Err(RepoError::AmbiguousResult {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            matches: matches.len(),
        });
    }

    Ok(matches.pop())
}

type EmployeeColumns = (EmployeeId, String, String, String);

fn read_employee_columns(row: &Row<'_>) -> rusqlite::Result<EmployeeColumns> {
    Ok((
        row.get("id")?,
        row.get("first_name")?,
        row.get("last_name")?,
        row.get("email")?,
    ))
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    into_valid_employee(read_employee_columns(row)?)
}

fn into_valid_employee(
    (id, first_name, last_name, email): EmployeeColumns,
) -> RepoResult<Employee> {
    let employee = Employee::stored(id, first_name, last_name, email);
    employee
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("employees row {id}: {err}")))?;
    Ok(employee)
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "employees")? {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    for column in EMPLOYEE_COLUMNS {
        if !table_has_column(conn, "employees", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
