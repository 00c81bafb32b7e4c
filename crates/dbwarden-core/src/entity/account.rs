//! Login accounts

use std::fmt;

/// A `user@host` login identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub host: String,
}

impl Account {
    pub fn is_virtual(&self) -> bool {
        false
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.host)
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::DatabaseBuilder;

    #[test]
    fn display_is_user_at_host() {
        let mut builder = DatabaseBuilder::new("localhost", 3306);
        builder.add_account("root", "localhost");
        let database = builder.build();

        let account = database.account("root", "localhost").unwrap();
        assert_eq!(account.to_string(), "root@localhost");
        assert!(!account.is_virtual());
        assert_eq!(account.database().name(), "localhost:3306");
    }
}
