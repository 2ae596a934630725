//! Error types for FixedToken ledger operations.

use crate::Amount;
use thiserror::Error;

/// Main error type for ledger operations.
///
/// Every rejection carries the specific violated precondition; a rejected
/// operation performs zero mutation and emits zero events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Sender/owner balance below the requested transfer amount.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Amount,
        available: Amount,
    },

    /// Spender's approved amount below the requested transfer amount.
    #[error("insufficient allowance: required {required}, approved {approved}")]
    InsufficientAllowance { required: Amount, approved: Amount },

    /// Arithmetic overflow on the amount register.
    ///
    /// Unreachable while the conservation invariant holds (every balance is
    /// bounded by total supply); kept so no arithmetic path can panic.
    #[error("amount overflow")]
    AmountOverflow,

    /// A snapshot failed validation on restore.
    #[error("corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },
}

impl LedgerError {
    /// Get a stable error code for boundary consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
            LedgerError::AmountOverflow => "AMOUNT_OVERFLOW",
            LedgerError::CorruptSnapshot { .. } => "CORRUPT_SNAPSHOT",
        }
    }
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
