//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the department/employee contract.
//! - Keep routing layers decoupled from storage details.

pub mod department_service;
pub mod employee_service;
pub mod populate;
