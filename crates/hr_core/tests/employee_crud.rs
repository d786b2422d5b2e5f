use hr_core::db::open_db_in_memory;
use hr_core::{
    DepartmentMatch, DepartmentRef, DepartmentService, Employee, EmployeeFilter, EmployeePatch,
    EmployeeRepository, EmployeeService, EmployeeView, NewDepartment, NewEmployee, Populate,
    RepoError, SqliteDepartmentRepository, SqliteEmployeeRepository,
};
use rusqlite::Connection;
use serde_json::json;

type Service<'conn> =
    EmployeeService<SqliteEmployeeRepository<'conn>, SqliteDepartmentRepository<'conn>>;

fn employee_service(conn: &Connection) -> Service<'_> {
    EmployeeService::new(
        SqliteEmployeeRepository::try_new(conn).unwrap(),
        SqliteDepartmentRepository::try_new(conn).unwrap(),
    )
}

/// John -> Marketing, Diana -> Consulting, both referenced by id.
fn seed_people_with_departments(conn: &Connection) {
    let departments = DepartmentService::new(SqliteDepartmentRepository::try_new(conn).unwrap());
    let employees = employee_service(conn);

    for name in ["Marketing", "Consulting"] {
        departments.create(NewDepartment::new(name)).unwrap();
    }
    for (first_name, last_name, department) in
        [("John", "Doe", "Marketing"), ("Diana", "Brown", "Consulting")]
    {
        let department = departments.find_by_name(department).unwrap().unwrap();
        employees
            .create(NewEmployee::new(first_name, last_name, &department))
            .unwrap();
    }
}

/// John Doe and Diana Brown, both in the unresolved department "IT".
fn seed_people_in_it(service: &Service<'_>) {
    for (first_name, last_name) in [("John", "Doe"), ("Diana", "Brown")] {
        service
            .create(NewEmployee::new(first_name, last_name, "IT"))
            .unwrap();
    }
}

fn find_by_first_name(service: &Service<'_>, first_name: &str) -> Option<EmployeeView> {
    service
        .find_one(&EmployeeFilter::all().first_name(first_name), &Populate::None)
        .unwrap()
}

#[test]
fn find_all_with_populate_attaches_departments() {
    let conn = open_db_in_memory().unwrap();
    seed_people_with_departments(&conn);
    let service = employee_service(&conn);

    let employees = service
        .find_all(&EmployeeFilter::all(), &Populate::department())
        .unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(
        employees[0].department.populated().map(|d| d.name.as_str()),
        Some("Marketing")
    );
    assert_eq!(
        employees[1].department.populated().map(|d| d.name.as_str()),
        Some("Consulting")
    );

    let json = serde_json::to_value(&employees[0]).unwrap();
    assert_eq!(json["department"]["name"], "Marketing");
    assert_eq!(json["firstName"], "John");
}

#[test]
fn find_one_by_various_params() {
    let conn = open_db_in_memory().unwrap();
    seed_people_with_departments(&conn);
    let service = employee_service(&conn);

    for filter in [
        EmployeeFilter::all().first_name("John"),
        EmployeeFilter::all().last_name("Brown"),
    ] {
        assert!(service.find_one(&filter, &Populate::None).unwrap().is_some());
    }

    let populate = Populate::department_matching(DepartmentMatch::name("Marketing"));
    let john = service
        .find_one(&EmployeeFilter::all(), &populate)
        .unwrap()
        .unwrap();
    assert_eq!(john.first_name, "John");
    assert_eq!(
        john.department.populated().map(|d| d.name.as_str()),
        Some("Marketing")
    );
}

#[test]
fn department_sub_filter_never_excludes_employees() {
    let conn = open_db_in_memory().unwrap();
    seed_people_with_departments(&conn);
    let service = employee_service(&conn);

    let populate = Populate::department_matching(DepartmentMatch::name("Marketing"));
    let diana = service
        .find_one(&EmployeeFilter::all().first_name("Diana"), &populate)
        .unwrap()
        .unwrap();
    assert_eq!(diana.last_name, "Brown");
    assert_eq!(diana.department.populated(), None);

    let everyone = service.find_all(&EmployeeFilter::all(), &populate).unwrap();
    assert_eq!(everyone.len(), 2);
    assert!(everyone[0].department.populated().is_some());
    assert!(everyone[1].department.populated().is_none());
}

#[test]
fn populate_does_not_change_stored_reference() {
    let conn = open_db_in_memory().unwrap();
    seed_people_with_departments(&conn);
    let service = employee_service(&conn);

    let before = service
        .find_all(&EmployeeFilter::all(), &Populate::None)
        .unwrap();
    service
        .find_all(&EmployeeFilter::all(), &Populate::department())
        .unwrap();
    let after = service
        .find_all(&EmployeeFilter::all(), &Populate::None)
        .unwrap();
    assert_eq!(before, after);
    assert!(matches!(
        after[0].department.reference(),
        Some(DepartmentRef::Id(_))
    ));
}

#[test]
fn create_accepts_unknown_department_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let created = service
        .create_from_document(&json!({ "firstName": "Mike", "lastName": "White", "department": "UX" }))
        .unwrap();
    let loaded = service.find_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);

    let view = service
        .find_one(&EmployeeFilter::all().first_name("Mike"), &Populate::department())
        .unwrap()
        .unwrap();
    assert_eq!(view.id, created.id);
    assert_eq!(view.department.populated(), None);
}

#[test]
fn create_keeps_non_canonical_uuid_department_text_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    for department in [
        "DEADBEEFDEADBEEFDEADBEEFDEADBEEF",
        "DEADBEEF-DEAD-BEEF-DEAD-BEEFDEADBEEF",
        "deadbeefdeadbeefdeadbeefdeadbeef",
    ] {
        let created = service
            .create_from_document(
                &json!({ "firstName": "Mike", "lastName": "White", "department": department }),
            )
            .unwrap();
        assert_eq!(created.department, DepartmentRef::Name(department.to_string()));

        let loaded = service.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        let json = serde_json::to_value(&loaded).unwrap();
        assert_eq!(json["department"], department);
    }
}

#[test]
fn create_reports_all_invalid_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let err = service
        .create_from_document(&json!({ "firstName": [] }))
        .unwrap_err();
    match err {
        RepoError::Validation(errors) => assert_eq!(errors.len(), 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service
        .find_all(&EmployeeFilter::all(), &Populate::None)
        .unwrap()
        .is_empty());
}

#[test]
fn update_one_merges_only_patched_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    let updated = service
        .update_one(
            &EmployeeFilter::all().first_name("John"),
            &EmployeePatch::default().last_name("White"),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let john = service
        .find_one(&EmployeeFilter::all().last_name("White"), &Populate::None)
        .unwrap()
        .unwrap();
    assert_eq!(john.first_name, "John");
    assert_eq!(john.last_name, "White");
    assert_eq!(john.department.reference(), Some(&DepartmentRef::name("IT")));
}

#[test]
fn update_one_without_match_is_zero() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    let updated = service
        .update_one(
            &EmployeeFilter::all().first_name("Nobody"),
            &EmployeePatch::default().last_name("White"),
        )
        .unwrap();
    assert_eq!(updated, 0);
}

#[test]
fn save_replaces_loaded_instance() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    let view = find_by_first_name(&service, "John").unwrap();
    let mut john: Employee = service.find_by_id(view.id).unwrap().unwrap();
    john.last_name = "White".to_string();
    service.save(&john).unwrap();

    let reloaded = service
        .find_one(&EmployeeFilter::all().last_name("White"), &Populate::None)
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.first_name, "John");
    assert_eq!(reloaded.department.reference(), Some(&DepartmentRef::name("IT")));
}

#[test]
fn save_rejects_invalid_and_removed_instances() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    let mut mike = service
        .create(NewEmployee::new("Mike", "White", "UX"))
        .unwrap();

    mike.first_name.clear();
    assert!(matches!(
        service.save(&mike).unwrap_err(),
        RepoError::Validation(_)
    ));

    mike.first_name = "Michael".to_string();
    service.remove(mike.id).unwrap();
    assert!(matches!(
        service.save(&mike).unwrap_err(),
        RepoError::EmployeeNotFound(id) if id == mike.id
    ));
}

#[test]
fn update_many_applies_patch_to_every_match() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    let updated = service
        .update_many(&EmployeeFilter::all(), &EmployeePatch::default().last_name("White"))
        .unwrap();
    assert_eq!(updated, 2);

    let whites = service
        .find_all(&EmployeeFilter::all().last_name("White"), &Populate::None)
        .unwrap();
    assert_eq!(whites.len(), 2);
}

#[test]
fn update_many_writes_nothing_when_merge_is_invalid() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    let err = service
        .update_many(&EmployeeFilter::all(), &EmployeePatch::default().last_name(""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let unchanged = service
        .find_all(&EmployeeFilter::all().last_name("Doe"), &Populate::None)
        .unwrap();
    assert_eq!(unchanged.len(), 1);
}

#[test]
fn bulk_update_rolls_back_when_a_row_is_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let john = repo
        .find_employee(&EmployeeFilter::all().first_name("John"))
        .unwrap()
        .unwrap();
    let ghost = Employee::create(NewEmployee::new("Mike", "White", "IT")).unwrap();
    let batch = vec![
        john.apply(&EmployeePatch::default().last_name("White")),
        ghost.apply(&EmployeePatch::default().last_name("White")),
    ];

    let err = repo.update_employees(&batch).unwrap_err();
    assert!(matches!(err, RepoError::EmployeeNotFound(id) if id == ghost.id));
    assert_eq!(repo.get_employee(john.id).unwrap(), Some(john));
}

#[test]
fn delete_one_removes_first_match_only() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    assert_eq!(
        service
            .delete_one(&EmployeeFilter::all().first_name("John"))
            .unwrap(),
        1
    );
    assert!(find_by_first_name(&service, "John").is_none());
    assert!(find_by_first_name(&service, "Diana").is_some());

    assert_eq!(service.delete_one(&EmployeeFilter::all()).unwrap(), 1);
    assert_eq!(service.delete_one(&EmployeeFilter::all()).unwrap(), 0);
}

#[test]
fn remove_deletes_loaded_instance() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    let john = find_by_first_name(&service, "John").unwrap();
    service.remove(john.id).unwrap();
    assert!(find_by_first_name(&service, "John").is_none());

    let err = service.remove(john.id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_many_is_repeatable_on_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);

    assert_eq!(service.delete_many(&EmployeeFilter::all()).unwrap(), 2);
    assert!(service
        .find_all(&EmployeeFilter::all(), &Populate::None)
        .unwrap()
        .is_empty());
    assert_eq!(service.delete_many(&EmployeeFilter::all()).unwrap(), 0);
    assert_eq!(service.delete_many(&EmployeeFilter::all()).unwrap(), 0);
}

#[test]
fn filters_by_department_reference() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    seed_people_in_it(&service);
    service
        .create(NewEmployee::new("Mike", "White", "UX"))
        .unwrap();

    let in_it = service
        .find_all(&EmployeeFilter::all().department("IT"), &Populate::None)
        .unwrap();
    assert_eq!(in_it.len(), 2);
    assert_eq!(
        service
            .delete_many(&EmployeeFilter::all().department("UX"))
            .unwrap(),
        1
    );
}

#[test]
fn deleting_department_leaves_dangling_reference_unresolved() {
    let conn = open_db_in_memory().unwrap();
    seed_people_with_departments(&conn);
    let departments = DepartmentService::new(SqliteDepartmentRepository::try_new(&conn).unwrap());
    let service = employee_service(&conn);

    let marketing = departments.find_by_name("Marketing").unwrap().unwrap();
    departments.delete_by_id(marketing.id).unwrap();

    let john = service
        .find_one(&EmployeeFilter::all().first_name("John"), &Populate::department())
        .unwrap()
        .unwrap();
    assert_eq!(john.department.populated(), None);
}
