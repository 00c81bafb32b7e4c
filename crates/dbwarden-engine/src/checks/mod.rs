//! Built-in checks
//!
//! One module per rule. Register new rules in [`default_checks`].

mod require_primary_key;
mod sane_innodb_primary_key;

pub use require_primary_key::RequirePrimaryKey;
pub use sane_innodb_primary_key::SaneInnoDbPrimaryKey;

use dbwarden_core::Check;

/// Every built-in check, in evaluation order
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![Box::new(RequirePrimaryKey), Box::new(SaneInnoDbPrimaryKey)]
}
