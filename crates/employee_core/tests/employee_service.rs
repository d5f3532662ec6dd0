use employee_core::db::open_db_in_memory;
use employee_core::{Employee, EmployeeService, RepoError, SqliteEmployeeRepository};

#[test]
fn hire_update_and_remove_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());

    let hired = service.hire("John", "Smith", "smith778@yahoo.com").unwrap();
    let id = hired.id().unwrap();
    assert!(id > 0);
    assert_eq!(
        service.find_by_email("smith778@yahoo.com").unwrap(),
        Some(hired.clone())
    );

    let mut edited = hired;
    edited.first_name = "Miski".to_string();
    edited.last_name = "Ali".to_string();
    edited.email = "miski_ali80@yahoo.com".to_string();
    service.update_employee(&edited).unwrap();

    let reloaded = service.get_employee(id).unwrap().unwrap();
    assert_eq!(reloaded.first_name, "Miski");
    assert_eq!(reloaded.email, "miski_ali80@yahoo.com");
    assert_eq!(service.find_by_name("Miski", "Ali").unwrap(), Some(reloaded));

    service.remove_employee(id).unwrap();
    assert!(service.get_employee(id).unwrap().is_none());
    assert_eq!(service.headcount().unwrap(), 0);
}

#[test]
fn update_requires_saved_employee() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());

    let err = service
        .update_employee(&Employee::new("John", "Smith", "smith778@yahoo.com"))
        .unwrap_err();

    assert!(matches!(err, RepoError::Unsaved));
    assert!(service.list_employees().unwrap().is_empty());
}
