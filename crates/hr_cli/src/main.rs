//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured record store and print collection sizes.
//! - Verify `hr_core` wiring independently of any HTTP layer.

use hr_core::db::open_db;
use hr_core::{
    core_version, init_logging, CoreConfig, DepartmentService, EmployeeFilter, EmployeeService,
    Populate, SqliteDepartmentRepository, SqliteEmployeeRepository,
};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("hr_cli logging disabled: {err}");
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("hr_cli failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let departments = DepartmentService::new(SqliteDepartmentRepository::try_new(&conn)?);
    let employees = EmployeeService::new(
        SqliteEmployeeRepository::try_new(&conn)?,
        SqliteDepartmentRepository::try_new(&conn)?,
    );

    let department_count = departments.find_all()?.len();
    let employee_views = employees.find_all(&EmployeeFilter::all(), &Populate::department())?;
    let unresolved = employee_views
        .iter()
        .filter(|view| view.department.populated().is_none())
        .count();

    println!("hr_core version={}", core_version());
    println!("store={}", config.db_path.display());
    println!("departments={department_count}");
    println!(
        "employees={} unresolved_departments={unresolved}",
        employee_views.len()
    );
    Ok(())
}
