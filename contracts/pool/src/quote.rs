//! Reserve reads and read-only previews
//!
//! Every operation prices against values read from the ledger at
//! invocation time; nothing here is cached. The quote functions are the
//! same pricing the mutating operations use, so a preview taken against
//! unchanged reserves matches the executed result exactly.

use cpamm_common::{
    derivation::derive_account_id,
    errors::{AmmError, AmmResult, LedgerError},
    ledger::Ledger,
    math::{calculate_deposit_amounts, calculate_swap_output, calculate_withdraw_amounts, SwapQuote},
    types::{Address, AssetId, PoolConfig, PoolSnapshot, SwapDirection},
};

/// Read both vault balances and the share supply
pub fn read_snapshot<L: Ledger>(ledger: &L, config: &PoolConfig) -> AmmResult<PoolSnapshot> {
    Ok(PoolSnapshot {
        reserve_x: ledger.balance_of(&config.vault_x())?,
        reserve_y: ledger.balance_of(&config.vault_y())?,
        share_supply: ledger.supply_of(&config.share_asset)?,
    })
}

/// Balance of `owner` in `asset`; a missing account holds nothing
pub fn held_balance<L: Ledger>(ledger: &L, owner: &Address, asset: &AssetId) -> AmmResult<u64> {
    match ledger.balance_of(&derive_account_id(owner, asset)) {
        Ok(amount) => Ok(amount),
        Err(LedgerError::AccountNotFound { .. }) => Ok(0),
        Err(err) => Err(err.into()),
    }
}

/// Price an exact-input swap
pub fn quote_swap(
    snapshot: &PoolSnapshot,
    fee_bps: u16,
    direction: SwapDirection,
    amount_in: u64,
) -> AmmResult<SwapQuote> {
    if amount_in == 0 {
        return Err(AmmError::ZeroAmount);
    }
    let (reserve_in, reserve_out) = snapshot.reserves_for(direction);
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::EmptyPool);
    }
    calculate_swap_output(amount_in, reserve_in, reserve_out, fee_bps)
}

/// Amounts required to mint `shares` into a live pool (rounded up)
pub fn quote_deposit(snapshot: &PoolSnapshot, shares: u64) -> AmmResult<(u64, u64)> {
    if shares == 0 {
        return Err(AmmError::ZeroAmount);
    }
    if snapshot.share_supply == 0 {
        // no ratio yet: the bootstrap depositor names the amounts
        return Err(AmmError::EmptyPool);
    }
    calculate_deposit_amounts(
        shares,
        snapshot.reserve_x,
        snapshot.reserve_y,
        snapshot.share_supply,
    )
}

/// Amounts released by burning `shares` (rounded down)
pub fn quote_withdraw(snapshot: &PoolSnapshot, shares: u64) -> AmmResult<(u64, u64)> {
    if shares == 0 {
        return Err(AmmError::ZeroAmount);
    }
    if shares > snapshot.share_supply {
        return Err(AmmError::InsufficientShares {
            available: snapshot.share_supply,
            requested: shares,
        });
    }
    calculate_withdraw_amounts(
        shares,
        snapshot.reserve_x,
        snapshot.reserve_y,
        snapshot.share_supply,
    )
}
