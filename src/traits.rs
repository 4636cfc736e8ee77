//! Traits for storage abstraction and extensibility

use crate::types::*;

/// Storage abstraction for the token ledger
///
/// Reads never fail: an account or allowance that was never written reads as
/// zero. All writes of one ledger operation arrive as a single [`StateChange`]
/// which the backend must apply atomically, so a failed commit leaves the
/// previous state fully intact.
pub trait TokenStorage: Send + Sync {
    /// Metadata of the deployed token, `None` before deployment
    fn metadata(&self) -> Option<TokenMetadata>;

    /// Balance of an account
    fn balance(&self, account: &Address) -> Amount;

    /// Remaining amount `spender` may move out of `owner`'s balance
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Current total supply
    fn total_supply(&self) -> Amount;

    /// All accounts with their balances
    fn balances(&self) -> Vec<(Address, Amount)>;

    /// All allowances as `(owner, spender, amount)`
    fn allowances(&self) -> Vec<(Address, Address, Amount)>;

    /// Events in commit order, optionally filtered to those touching `account`
    fn events(&self, account: Option<&Address>) -> Vec<EventRecord>;

    /// Apply every write in `change`, or none of them
    fn commit(&mut self, change: StateChange) -> TokenResult<()>;
}

/// Trait for implementing custom validation rules on ledger inputs
pub trait TokenValidator: Send + Sync {
    /// Validate token metadata before deployment
    fn validate_metadata(&self, metadata: &TokenMetadata) -> TokenResult<()>;

    /// Validate an account identifier used in a mutating operation
    fn validate_address(&self, address: &Address) -> TokenResult<()>;
}

/// Default validator: non-empty name, symbol and addresses
pub struct DefaultTokenValidator;

impl TokenValidator for DefaultTokenValidator {
    fn validate_metadata(&self, metadata: &TokenMetadata) -> TokenResult<()> {
        if metadata.name.trim().is_empty() {
            return Err(TokenError::InvalidArgument(
                "Token name cannot be empty".to_string(),
            ));
        }

        if metadata.symbol.trim().is_empty() {
            return Err(TokenError::InvalidArgument(
                "Token symbol cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_address(&self, address: &Address) -> TokenResult<()> {
        if address.is_blank() {
            return Err(TokenError::InvalidArgument(
                "Address cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
