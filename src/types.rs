//! Core types and data structures for the token ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Token quantity in base units (10^-decimals of a whole token)
pub type Amount = u128;

/// Number of decimal places used when no other value is configured
pub const DEFAULT_DECIMALS: u8 = 18;

/// Account identifier
///
/// The ledger treats addresses as opaque keys. Resolving a signer or caller
/// identity into an `Address` is left to the integration layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create a new address from any string-like identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Address {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Address {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Immutable token metadata, fixed at deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Decimal places between a whole token and a base unit
    pub decimals: u8,
}

impl TokenMetadata {
    /// Create metadata with the default number of decimals
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Override the number of decimals
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

/// What happened in a committed ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Initial supply credited to the deployer
    Mint { to: Address, amount: Amount },
    /// Tokens moved between accounts, with the burned share destroyed
    Transfer {
        from: Address,
        to: Address,
        /// Set when the transfer spent an allowance
        spender: Option<Address>,
        gross: Amount,
        burned: Amount,
        net: Amount,
    },
    /// Allowance set by an owner for a spender
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
}

impl EventKind {
    /// Whether the event touches the given account in any role
    pub fn involves(&self, account: &Address) -> bool {
        match self {
            EventKind::Mint { to, .. } => to == account,
            EventKind::Transfer {
                from, to, spender, ..
            } => from == account || to == account || spender.as_ref() == Some(account),
            EventKind::Approval { owner, spender, .. } => owner == account || spender == account,
        }
    }
}

/// Entry in the ledger's append-only event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier for the event
    pub id: Uuid,
    /// Event payload
    pub kind: EventKind,
    /// When the event was committed
    pub recorded_at: NaiveDateTime,
}

impl EventRecord {
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            recorded_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Outcome of a successful transfer or delegated transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub from: Address,
    pub to: Address,
    /// Amount debited from the sender
    pub gross: Amount,
    /// Amount destroyed
    pub burned: Amount,
    /// Amount credited to the recipient
    pub net: Amount,
}

/// A set of absolute writes that a storage backend must apply all-or-nothing
///
/// Balances and allowances hold the *new* values, not deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChange {
    pub metadata: Option<TokenMetadata>,
    pub balances: Vec<(Address, Amount)>,
    pub allowances: Vec<((Address, Address), Amount)>,
    pub total_supply: Option<Amount>,
    pub event: Option<EventRecord>,
}

impl StateChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(mut self, metadata: TokenMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn balance(mut self, account: Address, amount: Amount) -> Self {
        self.balances.push((account, amount));
        self
    }

    pub fn allowance(mut self, owner: Address, spender: Address, amount: Amount) -> Self {
        self.allowances.push(((owner, spender), amount));
        self
    }

    pub fn total_supply(mut self, amount: Amount) -> Self {
        self.total_supply = Some(amount);
        self
    }

    pub fn event(mut self, kind: EventKind) -> Self {
        self.event = Some(EventRecord::new(kind));
        self
    }
}

/// Serializable copy of the full ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub metadata: TokenMetadata,
    pub total_supply: Amount,
    /// Accounts with a non-zero balance, ordered by address
    pub balances: Vec<(Address, Amount)>,
    /// Non-zero allowances as `(owner, spender, amount)`, ordered by owner then spender
    pub allowances: Vec<(Address, Address, Amount)>,
}

/// Errors that can occur in the token ledger
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error(
        "You can't transfer more than what is available: {account} holds {available}, requested {requested}"
    )]
    InsufficientBalance {
        account: Address,
        requested: Amount,
        available: Amount,
    },
    #[error(
        "Insufficient allowance: {spender} may move {available} from {owner}, requested {requested}"
    )]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        requested: Amount,
        available: Amount,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for ledger operations
pub type TokenResult<T> = Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_event_involves_all_parties() {
        let event = EventKind::Transfer {
            from: Address::from("alice"),
            to: Address::from("bob"),
            spender: Some(Address::from("carol")),
            gross: 100,
            burned: 5,
            net: 95,
        };

        assert!(event.involves(&Address::from("alice")));
        assert!(event.involves(&Address::from("bob")));
        assert!(event.involves(&Address::from("carol")));
        assert!(!event.involves(&Address::from("dave")));
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = TokenError::InsufficientBalance {
            account: Address::from("alice"),
            requested: 1000,
            available: 0,
        };
        assert!(err
            .to_string()
            .starts_with("You can't transfer more than what is available"));
    }

    #[test]
    fn test_address_serializes_as_plain_string() {
        let json = serde_json::to_string(&Address::from("0xabc")).unwrap();
        assert_eq!(json, "\"0xabc\"");
    }
}
