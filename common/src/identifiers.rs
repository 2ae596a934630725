//! Identifier types for FixedToken ledger entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an account holding a balance on the ledger.
///
/// Accounts are opaque to the ledger: any non-empty identifier supplied by
/// the execution environment is a valid key. An account that has never been
/// credited simply reads as a zero balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the account ID format.
    pub fn is_valid(&self) -> bool {
        // Basic validation: non-empty, alphanumeric with underscores
        !self.0.is_empty()
            && self.0.len() <= 64
            && self.0.chars().all(|c| c.is_alphanumeric() || c == '_')
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_validation() {
        assert!(AccountId::new("ALICE").is_valid());
        assert!(AccountId::new("ACCOUNT_42").is_valid());
        assert!(!AccountId::new("").is_valid());
        assert!(!AccountId::new("account-with-dash").is_valid());
    }

    #[test]
    fn test_account_id_display() {
        let id = AccountId::new("TREASURY");
        assert_eq!(id.to_string(), "TREASURY");
        assert_eq!(id.as_str(), "TREASURY");
    }

    #[test]
    fn test_account_id_equality() {
        assert_eq!(AccountId::from("ALICE"), AccountId::new("ALICE"));
        assert_ne!(AccountId::new("ALICE"), AccountId::new("BOB"));
    }
}
