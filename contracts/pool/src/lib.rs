//! Constant-Product Pool Engine
//!
//! Two-asset AMM accounting over an external fungible ledger. Liquidity
//! providers deposit both assets for LP shares; traders swap one asset
//! for the other, paying a fee that stays in the pool.
//!
//! ## Execution Model
//!
//! Every operation:
//! 1. validates its arguments (no state read),
//! 2. resolves the addressed config and checks the supplied identifiers,
//! 3. reads reserves and share supply from the ledger,
//! 4. prices the operation and checks slippage bounds,
//! 5. issues ledger transfers/mints/burns.
//!
//! Steps 3-5 run between a ledger checkpoint and either commit or
//! rollback, so an operation is applied completely or not at all. Events
//! are recorded only after commit. The engine caches nothing: reserves
//! and supply are read from the ledger on every call.
//!
//! Operations on the same pool are ordered by whoever owns the engine
//! (`&mut self`); the engine itself takes no locks and never retries.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use cpamm_common::{
    errors::{AmmError, AmmResult},
    events::{EventLog, PoolEvent},
    ledger::Ledger,
    math::SwapQuote,
    types::{
        Address, AssetId, DepositReceipt, PoolAction, PoolConfig, PoolRef, PoolSnapshot,
        SwapDirection, SwapReceipt, WithdrawReceipt,
    },
    BTreeMap, Vec,
};

pub mod deposit;
pub mod initialize;
pub mod lock;
pub mod quote;
pub mod swap;
pub mod withdraw;

/// Result of a dispatched [`PoolAction`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum ActionOutcome {
    Deposited(DepositReceipt),
    Withdrew(WithdrawReceipt),
    Swapped(SwapReceipt),
    LockSet { locked: bool, changed: bool },
}

/// Pool registry plus the ledger it settles against
#[derive(Debug)]
pub struct PoolEngine<L: Ledger> {
    ledger: L,
    pools: BTreeMap<Address, PoolConfig>,
    events: EventLog,
}

impl<L: Ledger> PoolEngine<L> {
    /// Engine over `ledger` with no pools
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            pools: BTreeMap::new(),
            events: EventLog::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access (funding accounts, freezing, ...)
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take all recorded events
    pub fn drain_events(&mut self) -> Vec<PoolEvent> {
        self.events.drain()
    }

    /// Config stored at `address`
    pub fn config(&self, address: &Address) -> Option<&PoolConfig> {
        self.pools.get(address)
    }

    /// All registered pools, ordered by config address
    pub fn pools(&self) -> impl Iterator<Item = &PoolConfig> {
        self.pools.values()
    }

    // ============ Operations ============

    /// Create a pool for (seed, asset_x, asset_y[, authority])
    pub fn initialize(
        &mut self,
        seed: u64,
        asset_x: AssetId,
        asset_y: AssetId,
        fee_bps: u16,
        authority: Option<Address>,
    ) -> AmmResult<PoolConfig> {
        initialize::validate_args(fee_bps, &asset_x, &asset_y)?;

        let config = PoolConfig::new(seed, asset_x, asset_y, fee_bps, authority);
        let address = config.address();
        if self.pools.contains_key(&address) {
            return Err(AmmError::AlreadyExists { config: address });
        }

        atomic(&mut self.ledger, "initialize", |ledger| {
            initialize::execute(ledger, &config)
        })?;

        self.pools.insert(address, config.clone());
        self.events.emit(PoolEvent::PoolInitialized {
            config: address,
            seed,
            fee_bps,
            authority,
        });
        log::debug!("pool {:02x?} initialized, fee {} bps", &address[..4], fee_bps);

        Ok(config)
    }

    /// Mint `shares` to `provider`, paying at most `max_x` / `max_y`
    pub fn deposit(
        &mut self,
        provider: &Address,
        pool: &PoolRef,
        shares: u64,
        max_x: u64,
        max_y: u64,
    ) -> AmmResult<DepositReceipt> {
        deposit::validate_args(shares)?;
        let config = resolve(&self.pools, pool)?;
        check_caller(provider, pool)?;

        let receipt = atomic(&mut self.ledger, "deposit", |ledger| {
            deposit::execute(ledger, config, provider, shares, max_x, max_y)
        })?;

        self.events.emit(PoolEvent::LiquidityAdded {
            config: pool.config,
            provider: *provider,
            amount_x: receipt.amount_x,
            amount_y: receipt.amount_y,
            shares_minted: receipt.shares,
            bootstrap: receipt.bootstrap,
        });
        log::debug!(
            "deposit {} shares for ({}, {}), bootstrap={}",
            receipt.shares,
            receipt.amount_x,
            receipt.amount_y,
            receipt.bootstrap
        );

        Ok(receipt)
    }

    /// Burn `shares` from `provider`, receiving at least `min_x` / `min_y`
    pub fn withdraw(
        &mut self,
        provider: &Address,
        pool: &PoolRef,
        shares: u64,
        min_x: u64,
        min_y: u64,
    ) -> AmmResult<WithdrawReceipt> {
        withdraw::validate_args(shares)?;
        let config = resolve(&self.pools, pool)?;
        check_caller(provider, pool)?;

        let receipt = atomic(&mut self.ledger, "withdraw", |ledger| {
            withdraw::execute(ledger, config, provider, shares, min_x, min_y)
        })?;

        self.events.emit(PoolEvent::LiquidityRemoved {
            config: pool.config,
            provider: *provider,
            amount_x: receipt.amount_x,
            amount_y: receipt.amount_y,
            shares_burned: receipt.shares,
        });
        log::debug!(
            "withdraw {} shares for ({}, {})",
            receipt.shares,
            receipt.amount_x,
            receipt.amount_y
        );

        Ok(receipt)
    }

    /// Swap exactly `amount_in` for at least `min_out`
    pub fn swap(
        &mut self,
        trader: &Address,
        pool: &PoolRef,
        direction: SwapDirection,
        amount_in: u64,
        min_out: u64,
    ) -> AmmResult<SwapReceipt> {
        swap::validate_args(amount_in)?;
        let config = resolve(&self.pools, pool)?;
        check_caller(trader, pool)?;

        let receipt = atomic(&mut self.ledger, "swap", |ledger| {
            swap::execute(ledger, config, trader, direction, amount_in, min_out)
        })?;

        self.events.emit(PoolEvent::Swapped {
            config: pool.config,
            trader: *trader,
            direction,
            amount_in: receipt.amount_in,
            fee_amount: receipt.fee_amount,
            amount_out: receipt.amount_out,
        });
        log::debug!(
            "swap {:?} in {} (fee {}) out {}",
            direction,
            receipt.amount_in,
            receipt.fee_amount,
            receipt.amount_out
        );

        Ok(receipt)
    }

    /// Lock or unlock a pool; returns whether the flag changed
    pub fn set_locked(
        &mut self,
        caller: &Address,
        pool: &PoolRef,
        locked: bool,
    ) -> AmmResult<bool> {
        let config = self
            .pools
            .get_mut(&pool.config)
            .ok_or(AmmError::PoolNotFound { config: pool.config })?;
        check_ref(config, pool)?;

        let changed = lock::execute(config, caller, locked)?;
        if changed {
            self.events.emit(PoolEvent::LockChanged {
                config: pool.config,
                authority: *caller,
                locked,
            });
            log::debug!("pool {:02x?} locked={}", &pool.config[..4], locked);
        }
        Ok(changed)
    }

    /// Dispatch a [`PoolAction`] on behalf of `caller`
    pub fn execute(
        &mut self,
        caller: &Address,
        pool: &PoolRef,
        action: &PoolAction,
    ) -> AmmResult<ActionOutcome> {
        match *action {
            PoolAction::Deposit { shares, max_x, max_y } => self
                .deposit(caller, pool, shares, max_x, max_y)
                .map(ActionOutcome::Deposited),
            PoolAction::Withdraw { shares, min_x, min_y } => self
                .withdraw(caller, pool, shares, min_x, min_y)
                .map(ActionOutcome::Withdrew),
            PoolAction::Swap { direction, amount_in, min_out } => self
                .swap(caller, pool, direction, amount_in, min_out)
                .map(ActionOutcome::Swapped),
            PoolAction::SetLocked { locked } => self
                .set_locked(caller, pool, locked)
                .map(|changed| ActionOutcome::LockSet { locked, changed }),
        }
    }

    // ============ Views ============

    /// Current reserves and share supply
    pub fn pool_snapshot(&self, pool: &PoolRef) -> AmmResult<PoolSnapshot> {
        let config = resolve(&self.pools, pool)?;
        quote::read_snapshot(&self.ledger, config)
    }

    /// Preview a swap at current reserves (ignores the lock flag)
    pub fn quote_swap(
        &self,
        pool: &PoolRef,
        direction: SwapDirection,
        amount_in: u64,
    ) -> AmmResult<SwapQuote> {
        let config = resolve(&self.pools, pool)?;
        let snapshot = quote::read_snapshot(&self.ledger, config)?;
        quote::quote_swap(&snapshot, config.fee_bps, direction, amount_in)
    }

    /// Amounts a non-bootstrap deposit of `shares` would pay
    pub fn quote_deposit(&self, pool: &PoolRef, shares: u64) -> AmmResult<(u64, u64)> {
        let snapshot = self.pool_snapshot(pool)?;
        quote::quote_deposit(&snapshot, shares)
    }

    /// Amounts burning `shares` would pay out
    pub fn quote_withdraw(&self, pool: &PoolRef, shares: u64) -> AmmResult<(u64, u64)> {
        let snapshot = self.pool_snapshot(pool)?;
        quote::quote_withdraw(&snapshot, shares)
    }

    /// LP shares held by `owner`
    pub fn shares_of(&self, owner: &Address, pool: &PoolRef) -> AmmResult<u64> {
        let config = resolve(&self.pools, pool)?;
        quote::held_balance(&self.ledger, owner, &config.share_asset)
    }
}

/// Look up the config behind `pool` and check the supplied identifiers
fn resolve<'a>(
    pools: &'a BTreeMap<Address, PoolConfig>,
    pool: &PoolRef,
) -> AmmResult<&'a PoolConfig> {
    let config = pools
        .get(&pool.config)
        .ok_or(AmmError::PoolNotFound { config: pool.config })?;
    check_ref(config, pool)?;
    Ok(config)
}

/// The config owns both vaults, so it cannot act as a provider or trader
fn check_caller(caller: &Address, pool: &PoolRef) -> AmmResult<()> {
    if *caller == pool.config {
        return Err(AmmError::AccountMismatch {
            expected: pool.config,
            actual: *caller,
        });
    }
    Ok(())
}

fn check_ref(config: &PoolConfig, pool: &PoolRef) -> AmmResult<()> {
    if pool.asset_x != config.asset_x {
        return Err(AmmError::AccountMismatch {
            expected: config.asset_x,
            actual: pool.asset_x,
        });
    }
    if pool.asset_y != config.asset_y {
        return Err(AmmError::AccountMismatch {
            expected: config.asset_y,
            actual: pool.asset_y,
        });
    }
    let derived = config.address();
    if derived != pool.config {
        return Err(AmmError::AccountMismatch {
            expected: derived,
            actual: pool.config,
        });
    }
    Ok(())
}

/// Run `op` against the ledger, rolling back every mutation on error
fn atomic<L, T, F>(ledger: &mut L, operation: &'static str, op: F) -> AmmResult<T>
where
    L: Ledger,
    F: FnOnce(&mut L) -> AmmResult<T>,
{
    let checkpoint = ledger.checkpoint();
    match op(ledger) {
        Ok(value) => Ok(value),
        Err(err) => {
            ledger.rollback(checkpoint);
            log::warn!("{} aborted: {} [{}]", operation, err, err.code());
            Err(err)
        }
    }
}

// ============ Tests ============
