//! Main ledger state machine: balances, allowances, supply and the burn rule

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::TokenConfig;
use crate::ledger::burn::BurnSplit;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_positive_amount;

/// Token ledger over a storage backend
///
/// Mutating operations take `&mut self`; each one checks every precondition
/// before building a single [`StateChange`] and committing it, so a rejected
/// operation never leaves partial writes behind.
pub struct Ledger<S: TokenStorage> {
    storage: S,
    metadata: TokenMetadata,
    validator: Box<dyn TokenValidator>,
}

impl<S: TokenStorage> Ledger<S> {
    /// Deploy a new token, crediting the whole `initial_supply` to `deployer`
    pub fn new(
        storage: S,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply: Amount,
        deployer: &Address,
    ) -> TokenResult<Self> {
        Self::with_validator(
            storage,
            TokenMetadata::new(name, symbol),
            initial_supply,
            deployer,
            Box::new(DefaultTokenValidator),
        )
    }

    /// Deploy a new token with explicit metadata and a custom validator
    pub fn with_validator(
        mut storage: S,
        metadata: TokenMetadata,
        initial_supply: Amount,
        deployer: &Address,
        validator: Box<dyn TokenValidator>,
    ) -> TokenResult<Self> {
        if storage.metadata().is_some() {
            return Err(TokenError::InvalidArgument(
                "Storage already holds a deployed token".to_string(),
            ));
        }

        validator.validate_metadata(&metadata)?;
        validator.validate_address(deployer)?;
        validate_positive_amount(initial_supply)?;

        // Minting the initial supply is not a transfer, so no burn applies
        let change = StateChange::new()
            .metadata(metadata.clone())
            .balance(deployer.clone(), initial_supply)
            .total_supply(initial_supply)
            .event(EventKind::Mint {
                to: deployer.clone(),
                amount: initial_supply,
            });
        storage.commit(change)?;

        info!(
            name = %metadata.name,
            symbol = %metadata.symbol,
            decimals = metadata.decimals,
            %deployer,
            initial_supply,
            "Token deployed"
        );

        Ok(Self {
            storage,
            metadata,
            validator,
        })
    }

    /// Deploy a token described by a [`TokenConfig`]
    pub fn from_config(storage: S, config: &TokenConfig, deployer: &Address) -> TokenResult<Self> {
        let initial_supply = config.initial_supply_units()?;
        Self::with_validator(
            storage,
            config.metadata(),
            initial_supply,
            deployer,
            Box::new(DefaultTokenValidator),
        )
    }

    /// Attach to a storage backend that already holds a deployed token
    pub fn open(storage: S) -> TokenResult<Self> {
        Self::open_with_validator(storage, Box::new(DefaultTokenValidator))
    }

    /// Attach to deployed storage, enforcing a custom validator from now on
    ///
    /// The stored metadata must satisfy the validator.
    pub fn open_with_validator(storage: S, validator: Box<dyn TokenValidator>) -> TokenResult<Self> {
        let metadata = storage.metadata().ok_or_else(|| {
            TokenError::InvalidArgument("Storage holds no deployed token".to_string())
        })?;
        validator.validate_metadata(&metadata)?;

        Ok(Self {
            storage,
            metadata,
            validator,
        })
    }

    // Queries
    /// Balance of `account`, zero if it was never referenced
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.storage.balance(account)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.storage.allowance(owner, spender)
    }

    pub fn total_supply(&self) -> Amount {
        self.storage.total_supply()
    }

    pub fn token_name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Full event log in commit order
    pub fn events(&self) -> Vec<EventRecord> {
        self.storage.events(None)
    }

    /// Events in which `account` took part
    pub fn events_for(&self, account: &Address) -> Vec<EventRecord> {
        self.storage.events(Some(account))
    }

    /// Read access to the underlying storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // Mutations
    /// Move `amount` from `sender` to `recipient`, burning 5% of it
    ///
    /// The sender is debited the full amount, the recipient is credited the
    /// amount net of burn, and total supply shrinks by the burned part.
    pub fn transfer(
        &mut self,
        sender: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> TokenResult<TransferReceipt> {
        self.validator.validate_address(sender)?;
        self.validator.validate_address(recipient)?;

        self.settle(StateChange::new(), sender, recipient, amount, None)
    }

    /// Set the allowance of `spender` over `owner`'s balance, replacing any previous value
    ///
    /// The owner's balance is not checked; an allowance may exceed it.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<()> {
        self.validator.validate_address(owner)?;
        self.validator.validate_address(spender)?;

        let change = StateChange::new()
            .allowance(owner.clone(), spender.clone(), amount)
            .event(EventKind::Approval {
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
            });
        self.storage.commit(change)?;

        debug!(%owner, %spender, amount, "Allowance set");
        Ok(())
    }

    /// Move `amount` out of `owner`'s balance on behalf of `caller`
    ///
    /// Consumes the caller's allowance by the gross amount, then applies the
    /// same debit, burn and credit as [`Ledger::transfer`].
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> TokenResult<TransferReceipt> {
        self.validator.validate_address(caller)?;
        self.validator.validate_address(owner)?;
        self.validator.validate_address(recipient)?;

        let allowed = self.storage.allowance(owner, caller);
        if allowed < amount {
            warn!(%owner, spender = %caller, requested = amount, allowed, "Delegated transfer rejected");
            return Err(TokenError::InsufficientAllowance {
                owner: owner.clone(),
                spender: caller.clone(),
                requested: amount,
                available: allowed,
            });
        }

        let change = StateChange::new().allowance(owner.clone(), caller.clone(), allowed - amount);
        self.settle(change, owner, recipient, amount, Some(caller))
    }

    /// Debit `from`, credit `to` net of burn, shrink supply, and commit together with `change`
    fn settle(
        &mut self,
        change: StateChange,
        from: &Address,
        to: &Address,
        amount: Amount,
        spender: Option<&Address>,
    ) -> TokenResult<TransferReceipt> {
        let available = self.storage.balance(from);
        if available < amount {
            warn!(%from, %to, requested = amount, available, "Transfer rejected");
            return Err(TokenError::InsufficientBalance {
                account: from.clone(),
                requested: amount,
                available,
            });
        }

        let split = BurnSplit::compute(amount);
        let from_after = available - amount;
        let to_before = if from == to {
            from_after
        } else {
            self.storage.balance(to)
        };
        let to_after = to_before.checked_add(split.net).ok_or_else(|| {
            TokenError::InvalidArgument(format!("Balance of {to} would overflow"))
        })?;
        let supply_after = self
            .storage
            .total_supply()
            .checked_sub(split.burned)
            .ok_or_else(|| {
                TokenError::Storage("Total supply is smaller than the burned amount".to_string())
            })?;

        let mut change = change;
        if from != to {
            change = change.balance(from.clone(), from_after);
        }
        let change = change
            .balance(to.clone(), to_after)
            .total_supply(supply_after)
            .event(EventKind::Transfer {
                from: from.clone(),
                to: to.clone(),
                spender: spender.cloned(),
                gross: split.gross,
                burned: split.burned,
                net: split.net,
            });
        self.storage.commit(change)?;

        debug!(
            %from,
            %to,
            spender = ?spender.map(Address::as_str),
            gross = split.gross,
            burned = split.burned,
            net = split.net,
            total_supply = supply_after,
            "Transfer committed"
        );

        Ok(TransferReceipt {
            from: from.clone(),
            to: to.clone(),
            gross: split.gross,
            burned: split.burned,
            net: split.net,
        })
    }

    // Integrity and export
    /// Check that the balances add up to the total supply
    pub fn validate_integrity(&self) -> LedgerIntegrityReport {
        let total_supply = self.storage.total_supply();
        let balances = self.storage.balances();
        let mut issues = Vec::new();

        let balance_sum = balances
            .iter()
            .try_fold(0u128, |acc, (_, amount)| acc.checked_add(*amount));

        match balance_sum {
            Some(sum) if sum != total_supply => issues.push(format!(
                "Balances do not add up to total supply: balances = {sum}, total supply = {total_supply}"
            )),
            None => issues.push("Sum of balances overflows".to_string()),
            Some(_) => {}
        }

        if !issues.is_empty() {
            error!(?issues, "Ledger integrity check failed");
        }

        LedgerIntegrityReport {
            is_valid: issues.is_empty(),
            issues,
            total_supply,
            balance_sum,
            accounts: balances.len(),
        }
    }

    /// Export the current state
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut balances: Vec<(Address, Amount)> = self
            .storage
            .balances()
            .into_iter()
            .filter(|(_, amount)| *amount > 0)
            .collect();
        balances.sort();

        let mut allowances: Vec<(Address, Address, Amount)> = self
            .storage
            .allowances()
            .into_iter()
            .filter(|(_, _, amount)| *amount > 0)
            .collect();
        allowances.sort();

        LedgerSnapshot {
            metadata: self.metadata.clone(),
            total_supply: self.storage.total_supply(),
            balances,
            allowances,
        }
    }
}

/// Report on ledger integrity and validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerIntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub total_supply: Amount,
    /// Sum of all balances, `None` if it overflowed
    pub balance_sum: Option<Amount>,
    pub accounts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn deploy(supply: Amount) -> (Ledger<MemoryStorage>, Address) {
        let owner = Address::from("owner");
        let ledger = Ledger::new(MemoryStorage::new(), "DLToken", "DLT", supply, &owner).unwrap();
        (ledger, owner)
    }

    #[test]
    fn test_deploy_credits_deployer() {
        let (ledger, owner) = deploy(1_000_000);

        assert_eq!(ledger.token_name(), "DLToken");
        assert_eq!(ledger.symbol(), "DLT");
        assert_eq!(ledger.decimals(), DEFAULT_DECIMALS);
        assert_eq!(ledger.total_supply(), 1_000_000);
        assert_eq!(ledger.balance_of(&owner), 1_000_000);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_deploy_rejects_invalid_input() {
        let owner = Address::from("owner");

        let empty_name = Ledger::new(MemoryStorage::new(), "", "DLT", 1, &owner);
        assert!(matches!(empty_name, Err(TokenError::InvalidArgument(_))));

        let empty_symbol = Ledger::new(MemoryStorage::new(), "DLToken", "  ", 1, &owner);
        assert!(matches!(empty_symbol, Err(TokenError::InvalidArgument(_))));

        let zero_supply = Ledger::new(MemoryStorage::new(), "DLToken", "DLT", 0, &owner);
        assert!(matches!(zero_supply, Err(TokenError::InvalidArgument(_))));

        let no_deployer = Ledger::new(MemoryStorage::new(), "DLToken", "DLT", 1, &Address::from(""));
        assert!(matches!(no_deployer, Err(TokenError::InvalidArgument(_))));
    }

    #[test]
    fn test_deploy_twice_on_same_storage_fails() {
        let (ledger, owner) = deploy(100);
        let storage = ledger.storage().clone();

        let result = Ledger::new(storage, "Other", "OTH", 5, &owner);
        assert!(matches!(result, Err(TokenError::InvalidArgument(_))));
    }

    #[test]
    fn test_transfer_burns_five_percent() {
        let (mut ledger, owner) = deploy(1_000_000);
        let alice = Address::from("alice");

        let receipt = ledger.transfer(&owner, &alice, 1000).unwrap();

        assert_eq!(receipt.burned, 50);
        assert_eq!(receipt.net, 950);
        assert_eq!(ledger.balance_of(&alice), 950);
        assert_eq!(ledger.balance_of(&owner), 999_000);
        assert_eq!(ledger.total_supply(), 999_950);
        assert!(ledger.validate_integrity().is_valid);
    }

    #[test]
    fn test_self_transfer_loses_only_burn() {
        let (mut ledger, owner) = deploy(1_000_000);

        ledger.transfer(&owner, &owner, 1000).unwrap();

        assert_eq!(ledger.balance_of(&owner), 999_950);
        assert_eq!(ledger.total_supply(), 999_950);
        assert!(ledger.validate_integrity().is_valid);
    }

    #[test]
    fn test_zero_transfer_is_allowed() {
        let (mut ledger, owner) = deploy(1_000);
        let alice = Address::from("alice");

        let receipt = ledger.transfer(&alice, &owner, 0).unwrap();

        assert_eq!(receipt.burned, 0);
        assert_eq!(receipt.net, 0);
        assert_eq!(ledger.total_supply(), 1_000);
        assert_eq!(ledger.balance_of(&owner), 1_000);
    }

    #[test]
    fn test_transfer_rejects_overdraft_without_side_effects() {
        let (mut ledger, owner) = deploy(1_000);
        let alice = Address::from("alice");
        let before = ledger.snapshot();

        let err = ledger.transfer(&alice, &owner, 1000).unwrap_err();

        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                account: alice,
                requested: 1000,
                available: 0,
            }
        );
        assert_eq!(ledger.snapshot(), before);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_approve_overwrites() {
        let (mut ledger, owner) = deploy(1_000);
        let alice = Address::from("alice");

        ledger.approve(&owner, &alice, 500).unwrap();
        ledger.approve(&owner, &alice, 200).unwrap();

        assert_eq!(ledger.allowance(&owner, &alice), 200);
        // Approval above the owner's balance is accepted
        ledger.approve(&owner, &alice, 5_000).unwrap();
        assert_eq!(ledger.allowance(&owner, &alice), 5_000);
    }

    #[test]
    fn test_transfer_from_consumes_gross_allowance() {
        let (mut ledger, owner) = deploy(1_000_000);
        let alice = Address::from("alice");
        let bob = Address::from("bob");

        ledger.approve(&owner, &alice, 3000).unwrap();
        let receipt = ledger.transfer_from(&alice, &owner, &bob, 2000).unwrap();

        assert_eq!(receipt.net, 1900);
        assert_eq!(ledger.balance_of(&bob), 1900);
        assert_eq!(ledger.balance_of(&owner), 998_000);
        assert_eq!(ledger.allowance(&owner, &alice), 1000);
        assert_eq!(ledger.total_supply(), 999_900);
    }

    #[test]
    fn test_transfer_from_checks_allowance_before_balance() {
        let (mut ledger, owner) = deploy(1_000);
        let alice = Address::from("alice");
        let bob = Address::from("bob");

        let err = ledger.transfer_from(&alice, &bob, &owner, 10).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));

        ledger.approve(&bob, &alice, 10).unwrap();
        let err = ledger.transfer_from(&alice, &bob, &owner, 10).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));

        // Rejected delegated transfer leaves the allowance untouched
        assert_eq!(ledger.allowance(&bob, &alice), 10);
    }

    #[test]
    fn test_events_for_filters_by_account() {
        let (mut ledger, owner) = deploy(1_000);
        let alice = Address::from("alice");
        let bob = Address::from("bob");

        ledger.transfer(&owner, &alice, 100).unwrap();
        ledger.approve(&owner, &bob, 50).unwrap();

        assert_eq!(ledger.events_for(&alice).len(), 1);
        assert_eq!(ledger.events_for(&bob).len(), 1);
        assert_eq!(ledger.events_for(&owner).len(), 3);
    }

    #[test]
    fn test_open_requires_deployed_storage() {
        assert!(Ledger::open(MemoryStorage::new()).is_err());

        let (ledger, _) = deploy(100);
        let reopened = Ledger::open(ledger.storage().clone()).unwrap();
        assert_eq!(reopened.symbol(), "DLT");
        assert_eq!(reopened.total_supply(), 100);
    }

    #[test]
    fn test_open_with_validator_keeps_strict_rules() {
        use crate::utils::validation::StrictTokenValidator;

        let owner = Address::from("owner");
        let ledger = Ledger::with_validator(
            MemoryStorage::new(),
            TokenMetadata::new("DLToken", "DLT"),
            1_000,
            &owner,
            Box::new(StrictTokenValidator),
        )
        .unwrap();

        let mut reopened =
            Ledger::open_with_validator(ledger.storage().clone(), Box::new(StrictTokenValidator))
                .unwrap();

        // Whitespace is accepted by the default rules but not the strict ones
        let err = reopened
            .transfer(&owner, &Address::from("bad address"), 10)
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidArgument(_)));
        assert_eq!(reopened.balance_of(&owner), 1_000);

        let mut lenient = Ledger::open(ledger.storage().clone()).unwrap();
        assert!(lenient
            .transfer(&owner, &Address::from("bad address"), 10)
            .is_ok());
    }

    #[test]
    fn test_open_with_validator_rejects_stored_metadata() {
        use crate::utils::validation::StrictTokenValidator;

        let owner = Address::from("owner");
        let ledger = Ledger::new(MemoryStorage::new(), "DLToken", "D-LT", 100, &owner).unwrap();

        let result =
            Ledger::open_with_validator(ledger.storage().clone(), Box::new(StrictTokenValidator));
        assert!(matches!(result, Err(TokenError::InvalidArgument(_))));
    }
}
