//! Thread-safe handle serializing access to a ledger

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ledger::core::{Ledger, LedgerIntegrityReport};
use crate::traits::*;
use crate::types::*;

/// Cloneable handle to a ledger shared between threads
///
/// Queries take the read lock and may run concurrently with each other.
/// Mutations take the write lock, so they are totally ordered and never
/// observed half-applied.
pub struct SharedLedger<S: TokenStorage> {
    inner: Arc<RwLock<Ledger<S>>>,
}

impl<S: TokenStorage> Clone for SharedLedger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TokenStorage> SharedLedger<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // A panic while holding the lock cannot leave a partial commit behind,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Ledger<S>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger<S>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure with shared access to the ledger
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger<S>) -> R) -> R {
        f(&self.read())
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.read().balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.read().allowance(owner, spender)
    }

    pub fn total_supply(&self) -> Amount {
        self.read().total_supply()
    }

    pub fn metadata(&self) -> TokenMetadata {
        self.read().metadata().clone()
    }

    pub fn transfer(
        &self,
        sender: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> TokenResult<TransferReceipt> {
        self.write().transfer(sender, recipient, amount)
    }

    pub fn approve(&self, owner: &Address, spender: &Address, amount: Amount) -> TokenResult<()> {
        self.write().approve(owner, spender, amount)
    }

    pub fn transfer_from(
        &self,
        caller: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> TokenResult<TransferReceipt> {
        self.write().transfer_from(caller, owner, recipient, amount)
    }

    pub fn validate_integrity(&self) -> LedgerIntegrityReport {
        self.read().validate_integrity()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.read().snapshot()
    }
}
