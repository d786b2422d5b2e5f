//! Domain model for department and employee records.
//!
//! # Responsibility
//! - Define canonical record shapes and their create/patch inputs.
//! - Own field-level validation shared by both entities.
//!
//! # Invariants
//! - Every record is identified by a stable, system-generated UUID.
//! - No record reaches storage without passing its entity validation.

pub mod department;
pub mod employee;
pub mod validate;
