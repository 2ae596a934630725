//! Core ledger state machine implementation.

use std::collections::HashMap;

use tracing::{debug, info};

use fixedtoken_common::{AccountId, Amount, LedgerError, Result};

use crate::event::{EventRecord, LedgerEvent};

/// The fixed-supply fungible-token ledger.
///
/// Owns the balance map, the allowance map, and the notification stream.
/// The only mutation paths are [`transfer`](TokenLedger::transfer),
/// [`approve`](TokenLedger::approve) and
/// [`transfer_from`](TokenLedger::transfer_from); each fully validates its
/// preconditions before committing any state, so a rejected call leaves the
/// ledger untouched and emits nothing.
///
/// The ledger does not schedule concurrency. It assumes the execution
/// environment serializes all calls to one instance, and it resolves caller
/// identity at the boundary: the `sender`/`owner`/`spender` arguments are the
/// authenticated caller, threaded in explicitly.
#[derive(Debug)]
pub struct TokenLedger {
    /// Token name, fixed at construction.
    pub(crate) name: String,
    /// Token symbol, fixed at construction.
    pub(crate) symbol: String,
    /// Total supply, fixed at construction.
    pub(crate) total_supply: Amount,
    /// Balance per account. Absent key reads as zero.
    pub(crate) balances: HashMap<AccountId, Amount>,
    /// Allowance per (owner, spender) pair. Absent key reads as zero.
    pub(crate) allowances: HashMap<(AccountId, AccountId), Amount>,
    /// Append-only notification stream, in acceptance order.
    pub(crate) events: Vec<EventRecord>,
}

impl TokenLedger {
    /// Create a ledger with the full supply credited to `initial_holder`.
    ///
    /// Construction happens exactly once per instance; there is no separate
    /// initialize step and re-initialization is unrepresentable.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        total_supply: Amount,
        initial_holder: AccountId,
    ) -> Self {
        let name = name.into();
        let symbol = symbol.into();

        info!(
            name = %name,
            symbol = %symbol,
            total_supply = %total_supply,
            initial_holder = %initial_holder,
            "Ledger initialized"
        );

        let mut balances = HashMap::new();
        balances.insert(initial_holder, total_supply);

        Self {
            name,
            symbol,
            total_supply,
            balances,
            allowances: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Get the token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the token symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the total supply.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Get an account's balance. Zero for any account never credited.
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Get the amount `spender` may still withdraw from `owner`.
    /// Zero for any pair never approved.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Move `amount` from `sender` to `recipient`.
    ///
    /// `sender` is the authenticated caller. Self-transfer is legal and
    /// net-zero, but still passes the balance check and still emits.
    pub fn transfer(
        &mut self,
        sender: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<()> {
        let sender_balance = self.balance_of(sender);
        let debited =
            sender_balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    required: amount,
                    available: sender_balance,
                })?;

        if sender != recipient {
            let credited = self
                .balance_of(recipient)
                .checked_add(amount)
                .ok_or(LedgerError::AmountOverflow)?;

            self.balances.insert(sender.clone(), debited);
            self.balances.insert(recipient.clone(), credited);
        }

        debug!(
            sender = %sender,
            recipient = %recipient,
            amount = %amount,
            "Transfer accepted"
        );

        self.emit(LedgerEvent::Transfer {
            from: sender.clone(),
            to: recipient.clone(),
            value: amount,
        });

        Ok(())
    }

    /// Set `spender`'s allowance from `owner` to exactly `amount`.
    ///
    /// `owner` is the authenticated caller. The previous allowance is
    /// overwritten, never incremented; see the crate docs for the inherited
    /// approve-race hazard this preserves.
    pub fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);

        debug!(
            owner = %owner,
            spender = %spender,
            amount = %amount,
            "Approval accepted"
        );

        self.emit(LedgerEvent::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            value: amount,
        });

        Ok(())
    }

    /// Move `amount` from `owner` to `recipient` on `spender`'s authority,
    /// consuming `spender`'s allowance.
    ///
    /// `spender` is the authenticated caller. The balance check and the
    /// allowance check are independent; either may be the reported cause.
    /// Emits one `Transfer` and no `Approval` (the allowance decrement is a
    /// side effect of the transfer, not a new approval).
    pub fn transfer_from(
        &mut self,
        spender: &AccountId,
        owner: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<()> {
        let owner_balance = self.balance_of(owner);
        let debited =
            owner_balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    required: amount,
                    available: owner_balance,
                })?;

        let approved = self.allowance(owner, spender);
        let remaining =
            approved
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientAllowance {
                    required: amount,
                    approved,
                })?;

        if owner != recipient {
            let credited = self
                .balance_of(recipient)
                .checked_add(amount)
                .ok_or(LedgerError::AmountOverflow)?;

            self.balances.insert(owner.clone(), debited);
            self.balances.insert(recipient.clone(), credited);
        }
        self.allowances
            .insert((owner.clone(), spender.clone()), remaining);

        debug!(
            spender = %spender,
            owner = %owner,
            recipient = %recipient,
            amount = %amount,
            remaining_allowance = %remaining,
            "Delegated transfer accepted"
        );

        self.emit(LedgerEvent::Transfer {
            from: owner.clone(),
            to: recipient.clone(),
            value: amount,
        });

        Ok(())
    }

    /// Get the full notification stream, in acceptance order.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Get all records at or after the given sequence number.
    pub fn events_since(&self, sequence: u64) -> &[EventRecord] {
        let start = (sequence as usize).min(self.events.len());
        &self.events[start..]
    }

    /// Iterate over `Transfer` records.
    pub fn transfers(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(|r| r.event.is_transfer())
    }

    /// Iterate over `Approval` records.
    pub fn approvals(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(|r| r.event.is_approval())
    }

    /// Verify ledger integrity: the sum of all balances equals total supply.
    pub fn verify_conservation(&self) -> bool {
        let circulating: Amount = self.balances.values().copied().sum();
        circulating == self.total_supply
    }

    /// Append one event record. Sequence numbers are the stream positions.
    fn emit(&mut self, event: LedgerEvent) {
        let sequence = self.events.len() as u64;
        self.events.push(EventRecord::new(sequence, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> TokenLedger {
        TokenLedger::new(
            "TestToken",
            "TST",
            Amount::new(1_000_000),
            AccountId::new("ALICE"),
        )
    }

    #[test]
    fn test_initial_state() {
        let ledger = ledger();

        assert_eq!(ledger.name(), "TestToken");
        assert_eq!(ledger.symbol(), "TST");
        assert_eq!(ledger.total_supply(), Amount::new(1_000_000));
        assert_eq!(
            ledger.balance_of(&AccountId::new("ALICE")),
            Amount::new(1_000_000)
        );
        assert_eq!(ledger.balance_of(&AccountId::new("BOB")), Amount::ZERO);
        assert!(ledger.events().is_empty());
        assert!(ledger.verify_conservation());
    }

    #[test]
    fn test_transfer_moves_balance() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");

        ledger.transfer(&alice, &bob, Amount::new(1000)).unwrap();

        assert_eq!(ledger.balance_of(&alice), Amount::new(999_000));
        assert_eq!(ledger.balance_of(&bob), Amount::new(1000));
        assert!(ledger.verify_conservation());
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = ledger();
        let bob = AccountId::new("BOB");
        let carol = AccountId::new("CAROL");

        let err = ledger.transfer(&bob, &carol, Amount::new(1)).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                required: Amount::new(1),
                available: Amount::ZERO,
            }
        );
        assert_eq!(ledger.balance_of(&bob), Amount::ZERO);
        assert_eq!(ledger.balance_of(&carol), Amount::ZERO);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_self_transfer_is_net_zero_but_checked() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");

        ledger.transfer(&alice, &alice, Amount::new(500)).unwrap();
        assert_eq!(ledger.balance_of(&alice), Amount::new(1_000_000));
        assert_eq!(ledger.transfers().count(), 1);

        // Still subject to the balance check
        let err = ledger
            .transfer(&alice, &alice, Amount::new(2_000_000))
            .unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
    }

    #[test]
    fn test_zero_amount_transfer_is_legal() {
        let mut ledger = ledger();
        let bob = AccountId::new("BOB");
        let carol = AccountId::new("CAROL");

        // Zero from an empty account passes the balance check
        ledger.transfer(&bob, &carol, Amount::ZERO).unwrap();
        assert_eq!(ledger.transfers().count(), 1);
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");

        ledger.approve(&alice, &bob, Amount::new(5000)).unwrap();
        ledger.approve(&alice, &bob, Amount::new(70)).unwrap();

        assert_eq!(ledger.allowance(&alice, &bob), Amount::new(70));
        assert_eq!(ledger.approvals().count(), 2);
    }

    #[test]
    fn test_allowance_is_directional() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");

        ledger.approve(&alice, &bob, Amount::new(1000)).unwrap();

        assert_eq!(ledger.allowance(&alice, &bob), Amount::new(1000));
        assert_eq!(ledger.allowance(&bob, &alice), Amount::ZERO);
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");
        let carol = AccountId::new("CAROL");

        ledger.approve(&alice, &bob, Amount::new(1000)).unwrap();
        ledger
            .transfer_from(&bob, &alice, &carol, Amount::new(1000))
            .unwrap();

        assert_eq!(ledger.allowance(&alice, &bob), Amount::ZERO);
        assert_eq!(ledger.balance_of(&alice), Amount::new(999_000));
        assert_eq!(ledger.balance_of(&carol), Amount::new(1000));
        assert!(ledger.verify_conservation());
    }

    #[test]
    fn test_transfer_from_exhausted_allowance() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");
        let carol = AccountId::new("CAROL");

        ledger.approve(&alice, &bob, Amount::new(1000)).unwrap();
        ledger
            .transfer_from(&bob, &alice, &carol, Amount::new(1000))
            .unwrap();

        let err = ledger
            .transfer_from(&bob, &alice, &carol, Amount::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientAllowance {
                required: Amount::new(1),
                approved: Amount::ZERO,
            }
        );
    }

    #[test]
    fn test_transfer_from_insufficient_owner_balance() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");
        let carol = AccountId::new("CAROL");

        // Bob holds nothing but approves generously
        ledger.approve(&bob, &carol, Amount::new(5000)).unwrap();

        let err = ledger
            .transfer_from(&carol, &bob, &alice, Amount::new(5000))
            .unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
        assert_eq!(ledger.allowance(&bob, &carol), Amount::new(5000));
    }

    #[test]
    fn test_rejected_transfer_from_mutates_nothing() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");
        let carol = AccountId::new("CAROL");

        ledger.approve(&alice, &bob, Amount::new(100)).unwrap();
        let events_before = ledger.events().len();

        let err = ledger
            .transfer_from(&bob, &alice, &carol, Amount::new(500))
            .unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_ALLOWANCE");

        assert_eq!(ledger.allowance(&alice, &bob), Amount::new(100));
        assert_eq!(ledger.balance_of(&alice), Amount::new(1_000_000));
        assert_eq!(ledger.balance_of(&carol), Amount::ZERO);
        assert_eq!(ledger.events().len(), events_before);
    }

    #[test]
    fn test_event_ordering() {
        let mut ledger = ledger();
        let alice = AccountId::new("ALICE");
        let bob = AccountId::new("BOB");

        ledger.transfer(&alice, &bob, Amount::new(10)).unwrap();
        ledger.approve(&alice, &bob, Amount::new(20)).unwrap();
        ledger
            .transfer_from(&bob, &alice, &bob, Amount::new(20))
            .unwrap();

        let sequences: Vec<u64> = ledger.events().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(ledger.transfers().count(), 2);
        assert_eq!(ledger.approvals().count(), 1);

        assert_eq!(ledger.events_since(2).len(), 1);
        assert_eq!(ledger.events_since(10).len(), 0);
    }
}
