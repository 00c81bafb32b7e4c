//! dbwarden engine - rule evaluation
//!
//! This crate implements the audit itself:
//! - The built-in checks
//! - The auditor that cross-applies checks to every entity of a database

pub mod auditor;
pub mod checks;

pub use auditor::{AuditError, Auditor};
pub use checks::{default_checks, RequirePrimaryKey, SaneInnoDbPrimaryKey};
