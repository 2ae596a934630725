//! FixedToken Ledger
//!
//! Fixed-supply fungible-token ledger: balance accounting, delegated-spending
//! allowances, and the transfer/approval operations that mutate them.
//!
//! The ledger validates every precondition before touching state
//! (validate-then-commit), keeps the sum of all balances equal to the total
//! supply at all times, and appends exactly one event per accepted mutation.
//!
//! # Allowance semantics
//!
//! [`TokenLedger::approve`] *overwrites* the previous allowance, it never
//! increments it. This matches the canonical allowance contract this ledger
//! implements, including its known approve-race hazard: a spender who front
//! runs an allowance change can spend both the old and the new allowance.
//! Callers that want "increase allowance" semantics must read-then-write.
//! The overwrite behavior is deliberate and must not be changed; downstream
//! integrations depend on it.

pub mod event;
pub mod ledger;
pub mod snapshot;

pub use event::{EventRecord, LedgerEvent};
pub use ledger::TokenLedger;
pub use snapshot::{AllowanceEntry, BalanceEntry, LedgerSnapshot};
