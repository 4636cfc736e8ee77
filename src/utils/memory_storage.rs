//! In-memory storage implementation for testing

use std::collections::HashMap;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_decimals;

/// In-memory storage implementation for testing and development
///
/// Cloning produces an independent copy of the whole state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    metadata: Option<TokenMetadata>,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
    events: Vec<EventRecord>,
}

impl MemoryStorage {
    /// Create a new, undeployed memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild storage from a snapshot
    ///
    /// The snapshot must describe a valid token whose balances add up to its
    /// total supply, with each account and each `(owner, spender)` pair listed
    /// at most once. The event log starts empty.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> TokenResult<Self> {
        let validator = DefaultTokenValidator;
        validator.validate_metadata(&snapshot.metadata)?;
        validate_decimals(snapshot.metadata.decimals)?;

        let mut balances = HashMap::with_capacity(snapshot.balances.len());
        for (account, amount) in snapshot.balances {
            validator.validate_address(&account)?;
            if balances.insert(account.clone(), amount).is_some() {
                return Err(TokenError::InvalidArgument(format!(
                    "Snapshot lists account {account} more than once"
                )));
            }
        }

        let mut allowances = HashMap::with_capacity(snapshot.allowances.len());
        for (owner, spender, amount) in snapshot.allowances {
            validator.validate_address(&owner)?;
            validator.validate_address(&spender)?;
            if allowances
                .insert((owner.clone(), spender.clone()), amount)
                .is_some()
            {
                return Err(TokenError::InvalidArgument(format!(
                    "Snapshot lists allowance of {spender} over {owner} more than once"
                )));
            }
        }

        let balance_sum = balances
            .values()
            .try_fold(0u128, |acc: Amount, amount| acc.checked_add(*amount));
        match balance_sum {
            Some(sum) if sum == snapshot.total_supply => {}
            Some(sum) => {
                return Err(TokenError::InvalidArgument(format!(
                    "Snapshot balances ({sum}) do not match total supply ({})",
                    snapshot.total_supply
                )))
            }
            None => {
                return Err(TokenError::InvalidArgument(
                    "Snapshot balances overflow".to_string(),
                ))
            }
        }

        Ok(Self {
            metadata: Some(snapshot.metadata),
            balances,
            allowances,
            total_supply: snapshot.total_supply,
            events: Vec::new(),
        })
    }

    /// Clear all data (useful for testing)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl TokenStorage for MemoryStorage {
    fn metadata(&self) -> Option<TokenMetadata> {
        self.metadata.clone()
    }

    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        // Tuple keys need owned values for lookup
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balances(&self) -> Vec<(Address, Amount)> {
        self.balances
            .iter()
            .map(|(account, amount)| (account.clone(), *amount))
            .collect()
    }

    fn allowances(&self) -> Vec<(Address, Address, Amount)> {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| (owner.clone(), spender.clone(), *amount))
            .collect()
    }

    fn events(&self, account: Option<&Address>) -> Vec<EventRecord> {
        self.events
            .iter()
            .filter(|event| account.is_none_or(|a| event.kind.involves(a)))
            .cloned()
            .collect()
    }

    fn commit(&mut self, change: StateChange) -> TokenResult<()> {
        // Nothing below can fail, so the change is applied all-or-nothing
        if let Some(metadata) = change.metadata {
            self.metadata = Some(metadata);
        }
        self.balances.extend(change.balances);
        self.allowances.extend(change.allowances);
        if let Some(total_supply) = change.total_supply {
            self.total_supply = total_supply;
        }
        if let Some(event) = change.event {
            self.events.push(event);
        }
        Ok(())
    }
}
