//! dbwarden Core
//!
//! Entity model, check contract and report types shared by every dbwarden crate.
//! Check codes are part of the public API - never rename them.

pub mod entity;
pub mod version;
pub mod report;
pub mod check;
pub mod audit;
pub mod config;
pub mod snapshot;

pub use entity::{
    Account, Column, ColumnInformationSchema, Database, DatabaseBuilder, Entity, EntityKind,
    GraphError, Id, Index, Node, Schema, Stored, Table, TableInformationSchema, PRIMARY_KEY_NAME,
};
pub use version::{ServerVersion, VersionError};
pub use report::{EntityRef, Report, Status};
pub use check::{Check, CheckError, CheckMeta};
pub use audit::{AuditResult, AuditSummary, AuditVersion};
pub use config::{Config, ConfigError, CheckSelection, SeverityThreshold};
pub use snapshot::{Snapshot, SnapshotError};
