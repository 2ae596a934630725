//! FixedToken Common Types
//!
//! This crate contains shared types used across the FixedToken ledger,
//! including account identifiers, the token amount register, and the
//! error taxonomy.

pub mod amount;
pub mod error;
pub mod identifiers;

pub use amount::*;
pub use error::*;
pub use identifiers::*;
