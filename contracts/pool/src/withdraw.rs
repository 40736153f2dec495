//! Liquidity withdrawal
//!
//! Burns shares for a floor-rounded slice of both reserves. Never gated
//! by the lock flag: holders can always exit.

use cpamm_common::{
    errors::{AmmError, AmmResult},
    ledger::Ledger,
    types::{Address, PoolConfig, PoolSnapshot, WithdrawReceipt},
};

use crate::quote::{held_balance, quote_withdraw, read_snapshot};

/// Reject bad arguments before any state is read
pub fn validate_args(shares: u64) -> AmmResult<()> {
    if shares == 0 {
        return Err(AmmError::ZeroAmount);
    }
    Ok(())
}

/// Compute what burning `shares` pays against `snapshot`, enforcing minimums
pub fn plan(
    snapshot: &PoolSnapshot,
    shares: u64,
    min_x: u64,
    min_y: u64,
) -> AmmResult<WithdrawReceipt> {
    let (amount_x, amount_y) = quote_withdraw(snapshot, shares)?;
    if amount_x < min_x {
        return Err(AmmError::SlippageExceeded { amount: amount_x, limit: min_x });
    }
    if amount_y < min_y {
        return Err(AmmError::SlippageExceeded { amount: amount_y, limit: min_y });
    }
    Ok(WithdrawReceipt {
        amount_x,
        amount_y,
        shares,
    })
}

/// Burn `shares` from `provider` and pay out both reserve slices
pub fn execute<L: Ledger>(
    ledger: &mut L,
    config: &PoolConfig,
    provider: &Address,
    shares: u64,
    min_x: u64,
    min_y: u64,
) -> AmmResult<WithdrawReceipt> {
    // 1. Caller must hold the shares
    let held = held_balance(ledger, provider, &config.share_asset)?;
    if held < shares {
        return Err(AmmError::InsufficientShares {
            available: held,
            requested: shares,
        });
    }

    // 2. Price against current reserves
    let snapshot = read_snapshot(ledger, config)?;
    let receipt = plan(&snapshot, shares, min_x, min_y)?;

    // 3. Burn first, then pay out
    let user_shares = ledger.get_or_create_account(provider, &config.share_asset)?;
    ledger.burn(&config.share_asset, &user_shares, shares)?;

    if receipt.amount_x > 0 {
        let user_x = ledger.get_or_create_account(provider, &config.asset_x)?;
        ledger.transfer(&config.vault_x(), &user_x, receipt.amount_x)?;
    }
    if receipt.amount_y > 0 {
        let user_y = ledger.get_or_create_account(provider, &config.asset_y)?;
        ledger.transfer(&config.vault_y(), &user_y, receipt.amount_y)?;
    }

    Ok(receipt)
}
