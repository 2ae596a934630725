//! Snapshot and restore of the durable ledger state.
//!
//! The durable state is exactly the tuple: name, symbol, total supply,
//! balance entries, allowance entries. The notification stream is not part
//! of it; a restored ledger starts with an empty stream.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use fixedtoken_common::{AccountId, Amount, LedgerError, Result};

use crate::ledger::TokenLedger;

/// One balance map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Account holding the balance.
    pub account: AccountId,
    /// Balance held.
    pub amount: Amount,
}

/// One allowance map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    /// Account that granted the allowance.
    pub owner: AccountId,
    /// Account authorized to spend.
    pub spender: AccountId,
    /// Remaining approved amount.
    pub amount: Amount,
}

/// A point-in-time copy of the full durable state.
///
/// Entries are kept as sorted lists rather than maps so the serialized form
/// is deterministic and survives formats with string-only map keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Total supply.
    pub total_supply: Amount,
    /// All balance entries, sorted by account.
    pub balances: Vec<BalanceEntry>,
    /// All allowance entries, sorted by (owner, spender).
    pub allowances: Vec<AllowanceEntry>,
}

impl TokenLedger {
    /// Capture the durable state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut balances: Vec<BalanceEntry> = self
            .balances
            .iter()
            .map(|(account, amount)| BalanceEntry {
                account: account.clone(),
                amount: *amount,
            })
            .collect();
        balances.sort_by(|a, b| a.account.cmp(&b.account));

        let mut allowances: Vec<AllowanceEntry> = self
            .allowances
            .iter()
            .map(|((owner, spender), amount)| AllowanceEntry {
                owner: owner.clone(),
                spender: spender.clone(),
                amount: *amount,
            })
            .collect();
        allowances.sort_by(|a, b| (&a.owner, &a.spender).cmp(&(&b.owner, &b.spender)));

        LedgerSnapshot {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            total_supply: self.total_supply,
            balances,
            allowances,
        }
    }

    /// Reconstruct a ledger from a snapshot.
    ///
    /// Validates the conservation invariant and rejects duplicate entries;
    /// a snapshot that fails either check is reported as
    /// [`LedgerError::CorruptSnapshot`].
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self> {
        let mut balances = HashMap::new();
        for entry in snapshot.balances {
            if balances.insert(entry.account.clone(), entry.amount).is_some() {
                return Err(LedgerError::CorruptSnapshot {
                    reason: format!("duplicate balance entry for {}", entry.account),
                });
            }
        }

        let mut allowances = HashMap::new();
        for entry in snapshot.allowances {
            let key = (entry.owner.clone(), entry.spender.clone());
            if allowances.insert(key, entry.amount).is_some() {
                return Err(LedgerError::CorruptSnapshot {
                    reason: format!(
                        "duplicate allowance entry for ({}, {})",
                        entry.owner, entry.spender
                    ),
                });
            }
        }

        let circulating: Amount = balances.values().copied().sum();
        if circulating != snapshot.total_supply {
            return Err(LedgerError::CorruptSnapshot {
                reason: format!(
                    "balances sum to {} but total supply is {}",
                    circulating, snapshot.total_supply
                ),
            });
        }

        info!(
            name = %snapshot.name,
            accounts = balances.len(),
            allowances = allowances.len(),
            "Ledger restored from snapshot"
        );

        Ok(Self {
            name: snapshot.name,
            symbol: snapshot.symbol,
            total_supply: snapshot.total_supply,
            balances,
            allowances,
            events: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_ledger() -> TokenLedger {
        let mut ledger = TokenLedger::new(
            "TestToken",
            "TST",
            Amount::new(1_000_000),
            AccountId::new("ALICE"),
        );
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");

        ledger.transfer(&alice, &bob, Amount::new(2500)).unwrap();
        ledger.approve(&alice, &bob, Amount::new(400)).unwrap();
        ledger
    }

    #[test]
    fn test_snapshot_restore_preserves_state() {
        let ledger = populated_ledger();
        let snapshot = ledger.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        let restored = TokenLedger::restore(decoded).unwrap();

        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");
        assert_eq!(restored.name(), "TestToken");
        assert_eq!(restored.total_supply(), Amount::new(1_000_000));
        assert_eq!(restored.balance_of(&alice), Amount::new(997_500));
        assert_eq!(restored.balance_of(&bob), Amount::new(2500));
        assert_eq!(restored.allowance(&alice, &bob), Amount::new(400));
        assert!(restored.verify_conservation());
        // The notification stream is not durable
        assert!(restored.events().is_empty());
    }

    #[test]
    fn test_restore_rejects_broken_conservation() {
        let mut snapshot = populated_ledger().snapshot();
        snapshot.balances[0].amount = Amount::new(1);

        let err = TokenLedger::restore(snapshot).unwrap_err();
        assert_eq!(err.error_code(), "CORRUPT_SNAPSHOT");
    }

    #[test]
    fn test_restore_rejects_duplicate_accounts() {
        let mut snapshot = populated_ledger().snapshot();
        let dup = snapshot.balances[0].clone();
        snapshot.balances.push(dup);

        let err = TokenLedger::restore(snapshot).unwrap_err();
        assert_eq!(err.error_code(), "CORRUPT_SNAPSHOT");
    }
}
