//! In-Memory Share Ledger
//!
//! Reference implementation of the `Ledger` collaborator: an asset
//! registry with per-asset mint authorities and supply tracking, plus
//! owner/asset accounts addressed by deterministic ids.
//!
//! Used by the pool engine's tests and demos in place of an external
//! fungible ledger. Supply always equals the sum of all balances of an
//! asset; `checkpoint`/`rollback` restore a full copy of the state.
//!
//! A checkpoint clones every asset and account, which costs O(ledger size)
//! per engine operation. A production ledger should checkpoint with a
//! journal of touched accounts or a native transaction instead.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use cpamm_common::{
    derivation::derive_account_id,
    errors::{LedgerError, LedgerResult},
    ledger::Ledger,
    types::{AccountId, Address, AssetId},
    BTreeMap,
};

// ============ Ledger State ============

/// Registered asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AssetState {
    /// Only identity allowed to mint (None = fixed supply)
    pub mint_authority: Option<Address>,
    /// Total supply tracking
    pub total_supply: u64,
}

/// Balance of one owner in one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenAccount {
    /// Owner address
    pub owner: Address,
    /// Asset held
    pub asset: AssetId,
    /// Balance amount
    pub amount: u64,
    /// Frozen accounts can neither send nor receive
    pub frozen: bool,
}

impl TokenAccount {
    pub fn new(owner: Address, asset: AssetId) -> Self {
        Self {
            owner,
            asset,
            amount: 0,
            frozen: false,
        }
    }
}

/// Ledger holding all assets and accounts in memory
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct InMemoryLedger {
    assets: BTreeMap<AssetId, AssetState>,
    accounts: BTreeMap<AccountId, TokenAccount>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `owner` in `asset`, zero if no account exists
    pub fn balance_of_owner(&self, owner: &Address, asset: &AssetId) -> u64 {
        self.accounts
            .get(&derive_account_id(owner, asset))
            .map(|a| a.amount)
            .unwrap_or(0)
    }

    /// Sum of all balances of `asset`
    pub fn total_held(&self, asset: &AssetId) -> u64 {
        self.accounts
            .values()
            .filter(|a| &a.asset == asset)
            .map(|a| a.amount)
            .sum()
    }

    /// Freeze or thaw an account
    pub fn set_frozen(&mut self, id: &AccountId, frozen: bool) -> LedgerResult<()> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or(LedgerError::AccountNotFound { account: *id })?;
        account.frozen = frozen;
        Ok(())
    }

    /// Register an asset and mint an initial balance to each holder
    pub fn create_funded_asset(
        &mut self,
        asset: AssetId,
        authority: Address,
        holders: &[(Address, u64)],
    ) -> LedgerResult<()> {
        self.create_asset(asset, Some(authority))?;
        for (owner, amount) in holders {
            let account = self.get_or_create_account(owner, &asset)?;
            self.mint(&authority, &asset, &account, *amount)?;
        }
        Ok(())
    }

    fn live_account(&self, id: &AccountId) -> LedgerResult<&TokenAccount> {
        let account = self
            .accounts
            .get(id)
            .ok_or(LedgerError::AccountNotFound { account: *id })?;
        if account.frozen {
            return Err(LedgerError::AccountFrozen { account: *id });
        }
        Ok(account)
    }

    fn asset_state(&self, asset: &AssetId) -> LedgerResult<&AssetState> {
        self.assets
            .get(asset)
            .ok_or(LedgerError::UnknownAsset { asset: *asset })
    }
}

impl Ledger for InMemoryLedger {
    type Checkpoint = InMemoryLedger;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.clone()
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        *self = checkpoint;
    }

    fn asset_exists(&self, asset: &AssetId) -> bool {
        self.assets.contains_key(asset)
    }

    fn create_asset(
        &mut self,
        asset: AssetId,
        mint_authority: Option<Address>,
    ) -> LedgerResult<()> {
        if self.assets.contains_key(&asset) {
            return Err(LedgerError::AssetAlreadyExists { asset });
        }
        self.assets.insert(
            asset,
            AssetState {
                mint_authority,
                total_supply: 0,
            },
        );
        Ok(())
    }

    fn get_or_create_account(
        &mut self,
        owner: &Address,
        asset: &AssetId,
    ) -> LedgerResult<AccountId> {
        self.asset_state(asset)?;
        let id = derive_account_id(owner, asset);
        self.accounts
            .entry(id)
            .or_insert_with(|| TokenAccount::new(*owner, *asset));
        Ok(id)
    }

    fn balance_of(&self, account: &AccountId) -> LedgerResult<u64> {
        self.accounts
            .get(account)
            .map(|a| a.amount)
            .ok_or(LedgerError::AccountNotFound { account: *account })
    }

    fn supply_of(&self, asset: &AssetId) -> LedgerResult<u64> {
        Ok(self.asset_state(asset)?.total_supply)
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64) -> LedgerResult<()> {
        // 1. Both accounts must exist, be live and hold the same asset
        let source = self.live_account(from)?;
        let dest = self.live_account(to)?;
        if source.asset != dest.asset {
            return Err(LedgerError::AssetMismatch {
                expected: source.asset,
                actual: dest.asset,
            });
        }

        // 2. Sender must have enough balance
        if source.amount < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                available: source.amount,
                requested: amount,
            });
        }
        if from == to {
            return Ok(());
        }

        // 3. Credit cannot overflow because supply bounds every balance
        let asset = source.asset;
        let new_dest = dest
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { asset })?;

        if let Some(account) = self.accounts.get_mut(from) {
            account.amount -= amount;
        }
        if let Some(account) = self.accounts.get_mut(to) {
            account.amount = new_dest;
        }
        log::trace!("transfer {} from {:02x?} to {:02x?}", amount, &from[..4], &to[..4]);
        Ok(())
    }

    fn mint(
        &mut self,
        authority: &Address,
        asset: &AssetId,
        to: &AccountId,
        amount: u64,
    ) -> LedgerResult<()> {
        // 1. Caller must be the asset's mint authority
        let state = self.asset_state(asset)?;
        if state.mint_authority.as_ref() != Some(authority) {
            return Err(LedgerError::MintUnauthorized {
                asset: *asset,
                caller: *authority,
            });
        }

        // 2. Recipient must hold this asset
        let dest = self.live_account(to)?;
        if &dest.asset != asset {
            return Err(LedgerError::AssetMismatch {
                expected: *asset,
                actual: dest.asset,
            });
        }

        // 3. Supply bounds the balance, so one check covers both
        let new_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { asset: *asset })?;

        if let Some(state) = self.assets.get_mut(asset) {
            state.total_supply = new_supply;
        }
        if let Some(account) = self.accounts.get_mut(to) {
            account.amount += amount;
        }
        log::trace!("mint {} of {:02x?}, supply {}", amount, &asset[..4], new_supply);
        Ok(())
    }

    fn burn(&mut self, asset: &AssetId, from: &AccountId, amount: u64) -> LedgerResult<()> {
        let state = self.asset_state(asset)?;
        let source = self.live_account(from)?;
        if &source.asset != asset {
            return Err(LedgerError::AssetMismatch {
                expected: *asset,
                actual: source.asset,
            });
        }
        if source.amount < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                available: source.amount,
                requested: amount,
            });
        }
        // supply bounds every balance
        let new_supply = state.total_supply - amount;

        if let Some(state) = self.assets.get_mut(asset) {
            state.total_supply = new_supply;
        }
        if let Some(account) = self.accounts.get_mut(from) {
            account.amount -= amount;
        }
        log::trace!("burn {} of {:02x?}, supply {}", amount, &asset[..4], new_supply);
        Ok(())
    }
}

// ============ Tests ============
