//! Ledger notification events.

use chrono::{DateTime, Utc};
use fixedtoken_common::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification emitted on acceptance of a state-changing operation.
///
/// `transfer` and `transfer_from` each emit exactly one `Transfer`;
/// `approve` emits exactly one `Approval`. A rejected operation emits
/// nothing. `transfer_from` does not emit an `Approval` for the allowance
/// decrement; the decrement is a side effect of a transfer, not a new
/// approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Tokens moved between two accounts.
    Transfer {
        from: AccountId,
        to: AccountId,
        value: Amount,
    },
    /// An owner set a spender's allowance.
    Approval {
        owner: AccountId,
        spender: AccountId,
        value: Amount,
    },
}

impl LedgerEvent {
    /// Check if this is a `Transfer` event.
    pub fn is_transfer(&self) -> bool {
        matches!(self, LedgerEvent::Transfer { .. })
    }

    /// Check if this is an `Approval` event.
    pub fn is_approval(&self) -> bool {
        matches!(self, LedgerEvent::Approval { .. })
    }

    /// Get the amount carried by the event.
    pub fn value(&self) -> Amount {
        match self {
            LedgerEvent::Transfer { value, .. } => *value,
            LedgerEvent::Approval { value, .. } => *value,
        }
    }
}

/// An event together with its position in the notification stream.
///
/// The sequence number carries the ordering guarantee: records are appended
/// in the order their causing operations were accepted, 1:1. The id and
/// timestamp are audit metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// Position in the stream, strictly increasing from 0.
    pub sequence: u64,
    /// The event payload.
    pub event: LedgerEvent,
    /// When the causing operation was accepted.
    pub emitted_at: DateTime<Utc>,
}

impl EventRecord {
    /// Create a record at the given stream position.
    pub fn new(sequence: u64, event: LedgerEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            event,
            emitted_at: Utc::now(),
        }
    }
}
