//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `employees` table with equality filters.
//! - Store the department reference unresolved (kind + value).
//!
//! # Invariants
//! - Writes call `Employee::validate()` before SQL mutations.
//! - Results are returned in insertion order (`seq ASC`).
//! - Bulk deletes matching zero rows succeed with a zero count.
//! - Bulk updates commit all rows or none.

use crate::model::employee::{DepartmentRef, Employee, EmployeeId};
use crate::repo::{ensure_table_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name,
    department_kind,
    department_ref
FROM employees";

const REQUIRED_COLUMNS: &[&str] = &[
    "seq",
    "uuid",
    "first_name",
    "last_name",
    "department_kind",
    "department_ref",
    "created_at",
    "updated_at",
];

/// Equality filter over employee fields. The default filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentRef>,
}

impl EmployeeFilter {
    /// Filter that matches every employee.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<DepartmentRef>) -> Self {
        self.department = Some(value.into());
        self
    }

    /// Builds `WHERE` clause text and bind values for this filter.
    fn to_where_clause(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(" WHERE 1 = 1");
        let mut bind_values = Vec::new();

        if let Some(first_name) = &self.first_name {
            sql.push_str(" AND first_name = ?");
            bind_values.push(Value::Text(first_name.clone()));
        }
        if let Some(last_name) = &self.last_name {
            sql.push_str(" AND last_name = ?");
            bind_values.push(Value::Text(last_name.clone()));
        }
        if let Some(department) = &self.department {
            sql.push_str(" AND department_kind = ? AND department_ref = ?");
            bind_values.push(Value::Text(department.kind().to_string()));
            bind_values.push(Value::Text(department.value()));
        }

        (sql, bind_values)
    }
}

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn list_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>;
    /// Returns the earliest inserted employee matching `filter`.
    fn find_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>>;
    /// Replaces all mutable fields of an existing employee.
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    /// Updates every given employee in one transaction; any failure
    /// leaves all of them unchanged.
    fn update_employees(&self, employees: &[Employee]) -> RepoResult<usize>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Deletes matching employees, at most `limit` when set, oldest first.
    fn delete_employees(&self, filter: &EmployeeFilter, limit: Option<u32>) -> RepoResult<usize>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Rejects connections whose schema is missing or outdated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "employees", REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_employees(
        &self,
        filter: &EmployeeFilter,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Employee>> {
        let (where_clause, mut bind_values) = filter.to_where_clause();
        let mut sql = format!("{EMPLOYEE_SELECT_SQL}{where_clause} ORDER BY seq ASC");
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (
                uuid,
                first_name,
                last_name,
                department_kind,
                department_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                employee.id.to_string(),
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.department.kind(),
                employee.department.value(),
            ],
        )?;

        Ok(employee.id)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_employee_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.query_employees(filter, None)
    }

    fn find_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        Ok(self.query_employees(filter, Some(1))?.into_iter().next())
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        write_employee_update(self.conn, employee)
    }

    fn update_employees(&self, employees: &[Employee]) -> RepoResult<usize> {
        // Dropping `tx` without commit rolls back earlier rows.
        let tx = self.conn.unchecked_transaction()?;
        for employee in employees {
            write_employee_update(&tx, employee)?;
        }
        tx.commit()?;
        Ok(employees.len())
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::EmployeeNotFound(id));
        }
        Ok(())
    }

    fn delete_employees(&self, filter: &EmployeeFilter, limit: Option<u32>) -> RepoResult<usize> {
        let (where_clause, mut bind_values) = filter.to_where_clause();
        let mut sql = format!(
            "DELETE FROM employees WHERE seq IN (
                SELECT seq FROM employees{where_clause} ORDER BY seq ASC"
        );
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }
        sql.push_str(");");

        Ok(self.conn.execute(&sql, params_from_iter(bind_values))?)
    }
}

fn write_employee_update(conn: &Connection, employee: &Employee) -> RepoResult<()> {
    employee.validate()?;

    let changed = conn.execute(
        "UPDATE employees
         SET
            first_name = ?1,
            last_name = ?2,
            department_kind = ?3,
            department_ref = ?4,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?5;",
        params![
            employee.first_name.as_str(),
            employee.last_name.as_str(),
            employee.department.kind(),
            employee.department.value(),
            employee.id.to_string(),
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::EmployeeNotFound(employee.id));
    }
    Ok(())
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "employees.uuid")?;

    let kind: String = row.get("department_kind")?;
    let value: String = row.get("department_ref")?;
    let department = match kind.as_str() {
        "id" => DepartmentRef::Id(parse_uuid(&value, "employees.department_ref")?),
        "name" => DepartmentRef::Name(value),
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid department kind `{other}` in employees.department_kind"
            )));
        }
    };

    let employee = Employee {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        department,
    };
    employee.validate().map_err(|err| {
        RepoError::InvalidData(format!("employee {uuid_text} failed validation: {err}"))
    })?;
    Ok(employee)
}
