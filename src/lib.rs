//! # Burn Token Core
//!
//! A fungible token ledger with allowance-based delegated transfers and a
//! mandatory 5% burn on every transfer.
//!
//! ## Features
//!
//! - **Balances and allowances**: zero-default lookups, no pre-registration of accounts
//! - **Burn on transfer**: `floor(amount * 5 / 100)` is destroyed and removed from total supply
//! - **Atomic operations**: every check runs before a single all-or-nothing commit
//! - **Storage abstraction**: backend-agnostic design with trait-based storage
//! - **Event log, snapshots and integrity checks**
//! - **Unit conversion**: exact decimal parsing of human-readable amounts
//!
//! ## Quick Start
//!
//! ```rust
//! use burn_token_core::{utils::MemoryStorage, Address, Ledger};
//!
//! let owner = Address::from("owner");
//! let alice = Address::from("alice");
//! let mut ledger = Ledger::new(MemoryStorage::new(), "DLToken", "DLT", 1_000_000, &owner).unwrap();
//!
//! ledger.transfer(&owner, &alice, 1000).unwrap();
//! assert_eq!(ledger.balance_of(&alice), 950);
//! assert_eq!(ledger.total_supply(), 999_950);
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
