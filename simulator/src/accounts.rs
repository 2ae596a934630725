//! Account roster for simulation runs.

use fixedtoken_common::AccountId;

/// Account factory for creating test account sets.
pub struct AccountFactory;

impl AccountFactory {
    /// Create N account identifiers. The first account is the treasury that
    /// receives the full supply at ledger construction.
    pub fn create_accounts(count: usize) -> Vec<AccountId> {
        let roster = [
            "TREASURY", "ALICE", "BOB", "CAROL", "DAVE", "ERIN", "FRANK", "GRACE", "HEIDI", "IVAN",
        ];

        (0..count)
            .map(|i| {
                if i < roster.len() {
                    AccountId::new(roster[i])
                } else {
                    // Generate identifiers for accounts beyond the roster
                    AccountId::new(format!("ACCOUNT_{}", i + 1))
                }
            })
            .collect()
    }
}
