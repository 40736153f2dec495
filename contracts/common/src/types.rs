//! Core Types for the Pool Engine
//!
//! Pool configuration, operation requests and the receipts each
//! operation returns.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::derivation::{derive_account_id, derive_config_address, derive_share_asset};

/// Type alias for identities (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for fungible asset identifiers
pub type AssetId = [u8; 32];

/// Type alias for ledger account identifiers
pub type AccountId = [u8; 32];

// ============ Pool Config ============

/// Immutable identity plus the mutable lock flag of one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolConfig {
    /// Disambiguates several pools over the same pair
    pub seed: u64,
    /// Optional identity allowed to toggle `locked`
    pub authority: Option<Address>,
    /// First reserve asset
    pub asset_x: AssetId,
    /// Second reserve asset
    pub asset_y: AssetId,
    /// LP share asset, minted by the config
    pub share_asset: AssetId,
    /// Swap fee in basis points, fixed at creation
    pub fee_bps: u16,
    /// Deposits and swaps disabled while set
    pub locked: bool,
}

impl PoolConfig {
    /// Build the config for a pool (without validating parameters)
    pub fn new(
        seed: u64,
        asset_x: AssetId,
        asset_y: AssetId,
        fee_bps: u16,
        authority: Option<Address>,
    ) -> Self {
        let address = derive_config_address(seed, &asset_x, &asset_y, authority.as_ref());
        Self {
            seed,
            authority,
            asset_x,
            asset_y,
            share_asset: derive_share_asset(&address),
            fee_bps,
            locked: false,
        }
    }

    /// Deterministic location of this config
    pub fn address(&self) -> Address {
        derive_config_address(self.seed, &self.asset_x, &self.asset_y, self.authority.as_ref())
    }

    /// Ledger account holding the X reserve
    pub fn vault_x(&self) -> AccountId {
        derive_account_id(&self.address(), &self.asset_x)
    }

    /// Ledger account holding the Y reserve
    pub fn vault_y(&self) -> AccountId {
        derive_account_id(&self.address(), &self.asset_y)
    }

    /// (input asset, output asset) for a swap direction
    pub fn swap_assets(&self, direction: SwapDirection) -> (AssetId, AssetId) {
        match direction {
            SwapDirection::XToY => (self.asset_x, self.asset_y),
            SwapDirection::YToX => (self.asset_y, self.asset_x),
        }
    }
}

/// Identifiers a caller supplies to address a pool
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct PoolRef {
    /// Config location
    pub config: Address,
    /// Claimed X asset
    pub asset_x: AssetId,
    /// Claimed Y asset
    pub asset_y: AssetId,
}

impl PoolRef {
    /// Reference derived from a known config
    pub fn of(config: &PoolConfig) -> Self {
        Self {
            config: config.address(),
            asset_x: config.asset_x,
            asset_y: config.asset_y,
        }
    }
}

// ============ Operations ============

/// Swap direction indicator
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum SwapDirection {
    /// Pay X, receive Y
    XToY,
    /// Pay Y, receive X
    YToX,
}

impl SwapDirection {
    /// The opposite direction
    pub fn reverse(self) -> Self {
        match self {
            SwapDirection::XToY => SwapDirection::YToX,
            SwapDirection::YToX => SwapDirection::XToY,
        }
    }
}

/// Pool actions dispatched by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum PoolAction {
    /// Mint `shares` paying at most `max_x`/`max_y`
    Deposit { shares: u64, max_x: u64, max_y: u64 },
    /// Burn `shares` receiving at least `min_x`/`min_y`
    Withdraw { shares: u64, min_x: u64, min_y: u64 },
    /// Exact-input swap with minimum output
    Swap { direction: SwapDirection, amount_in: u64, min_out: u64 },
    /// Toggle the lock flag (authority only)
    SetLocked { locked: bool },
}

// ============ Receipts ============

/// Reserves and supply as read from the ledger
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct PoolSnapshot {
    /// Vault X balance
    pub reserve_x: u64,
    /// Vault Y balance
    pub reserve_y: u64,
    /// Outstanding LP shares
    pub share_supply: u64,
}

impl PoolSnapshot {
    /// Constant product k = reserve_x * reserve_y
    pub fn k(&self) -> u128 {
        self.reserve_x as u128 * self.reserve_y as u128
    }

    /// (reserve_in, reserve_out) for a swap direction
    pub fn reserves_for(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::XToY => (self.reserve_x, self.reserve_y),
            SwapDirection::YToX => (self.reserve_y, self.reserve_x),
        }
    }
}

/// Result of a deposit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct DepositReceipt {
    /// X paid into the vault
    pub amount_x: u64,
    /// Y paid into the vault
    pub amount_y: u64,
    /// Shares minted to the caller
    pub shares: u64,
    /// Whether this deposit set the initial ratio
    pub bootstrap: bool,
}

/// Result of a withdrawal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct WithdrawReceipt {
    /// X paid out
    pub amount_x: u64,
    /// Y paid out
    pub amount_y: u64,
    /// Shares burned
    pub shares: u64,
}

/// Result of a swap
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct SwapReceipt {
    /// Direction of the trade
    pub direction: SwapDirection,
    /// Full input transferred into the vault
    pub amount_in: u64,
    /// Portion of the input retained as fee
    pub fee_amount: u64,
    /// Output transferred to the caller
    pub amount_out: u64,
}
