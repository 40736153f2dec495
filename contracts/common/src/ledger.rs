//! Ledger Collaborator Interface
//!
//! The fungible ledger custodies every balance the pool touches and is the
//! only source of truth for reserves and share supply. The engine reads
//! through it and issues transfer/mint/burn calls; it never keeps its own
//! copy of a balance.
//!
//! ## Atomicity
//!
//! `checkpoint` / `rollback` bracket a unit of work. The engine takes a
//! checkpoint before its first mutation and rolls back if any later call
//! fails, so an operation is applied completely or not at all.

use crate::errors::LedgerResult;
use crate::types::{AccountId, Address, AssetId};

/// Fungible ledger as consumed by the pool engine
pub trait Ledger {
    /// Opaque restore point
    type Checkpoint;

    /// Capture the current state
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Restore a captured state, discarding everything since
    fn rollback(&mut self, checkpoint: Self::Checkpoint);

    /// Whether `asset` is registered
    fn asset_exists(&self, asset: &AssetId) -> bool;

    /// Register `asset` with an optional mint authority and zero supply
    fn create_asset(&mut self, asset: AssetId, mint_authority: Option<Address>) -> LedgerResult<()>;

    /// Account of `owner` for `asset`, created empty if missing (idempotent)
    fn get_or_create_account(
        &mut self,
        owner: &Address,
        asset: &AssetId,
    ) -> LedgerResult<AccountId>;

    /// Current balance of an existing account
    fn balance_of(&self, account: &AccountId) -> LedgerResult<u64>;

    /// Outstanding supply of `asset`
    fn supply_of(&self, asset: &AssetId) -> LedgerResult<u64>;

    /// Move `amount` between two accounts of the same asset
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64) -> LedgerResult<()>;

    /// Create `amount` of `asset` in `to`; `authority` must be the mint authority
    fn mint(
        &mut self,
        authority: &Address,
        asset: &AssetId,
        to: &AccountId,
        amount: u64,
    ) -> LedgerResult<()>;

    /// Destroy `amount` of `asset` held in `from`
    fn burn(&mut self, asset: &AssetId, from: &AccountId, amount: u64) -> LedgerResult<()>;
}
