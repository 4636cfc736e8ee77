//! Ledger module containing the token state machine and burn arithmetic

pub mod burn;
pub mod core;
pub mod shared;

pub use self::burn::*;
pub use self::core::*;
pub use self::shared::*;
