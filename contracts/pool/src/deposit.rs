//! Liquidity deposit
//!
//! Two paths, chosen by the current share supply:
//!
//! - **Bootstrap** (supply == 0): `max_x`/`max_y` are paid in as-is and
//!   exactly `shares` are minted; the first depositor sets both the
//!   price and the share unit. Any residual vault balance (direct
//!   transfers into a vault) stays there and backs the new shares.
//! - **Proportional** (supply > 0): the required amounts round up, so the
//!   new holder pays at least their exact share of each reserve.
//!
//! The bootstrap checks (`ZeroAmount` on a zero cap, `BelowMinimum`) are
//! validation errors that depend on the share supply, so they are raised
//! after the snapshot read, still before any ledger mutation.

use cpamm_common::{
    constants::bootstrap::MIN_INITIAL_SHARES,
    errors::{AmmError, AmmResult},
    ledger::Ledger,
    types::{Address, DepositReceipt, PoolConfig, PoolSnapshot},
};

use crate::quote::{quote_deposit, read_snapshot};

/// Reject bad arguments before any state is read
pub fn validate_args(shares: u64) -> AmmResult<()> {
    if shares == 0 {
        return Err(AmmError::ZeroAmount);
    }
    Ok(())
}

/// Compute what a deposit pays against `snapshot`, enforcing slippage caps
pub fn plan(
    snapshot: &PoolSnapshot,
    shares: u64,
    max_x: u64,
    max_y: u64,
) -> AmmResult<DepositReceipt> {
    if snapshot.share_supply == 0 {
        if max_x == 0 || max_y == 0 {
            return Err(AmmError::ZeroAmount);
        }
        if shares < MIN_INITIAL_SHARES {
            return Err(AmmError::BelowMinimum {
                amount: shares,
                minimum: MIN_INITIAL_SHARES,
            });
        }
        return Ok(DepositReceipt {
            amount_x: max_x,
            amount_y: max_y,
            shares,
            bootstrap: true,
        });
    }

    let (amount_x, amount_y) = quote_deposit(snapshot, shares)?;
    if amount_x > max_x {
        return Err(AmmError::SlippageExceeded { amount: amount_x, limit: max_x });
    }
    if amount_y > max_y {
        return Err(AmmError::SlippageExceeded { amount: amount_y, limit: max_y });
    }

    Ok(DepositReceipt {
        amount_x,
        amount_y,
        shares,
        bootstrap: false,
    })
}

/// Pay both reserve amounts into the vaults and mint shares to `provider`
pub fn execute<L: Ledger>(
    ledger: &mut L,
    config: &PoolConfig,
    provider: &Address,
    shares: u64,
    max_x: u64,
    max_y: u64,
) -> AmmResult<DepositReceipt> {
    // 1. Locked pools take no new liquidity
    if config.locked {
        return Err(AmmError::PoolLocked);
    }

    // 2. Price against current reserves
    let snapshot = read_snapshot(ledger, config)?;
    let receipt = plan(&snapshot, shares, max_x, max_y)?;

    // 3. Move funds and mint
    let config_address = config.address();
    let user_x = ledger.get_or_create_account(provider, &config.asset_x)?;
    let user_y = ledger.get_or_create_account(provider, &config.asset_y)?;
    let user_shares = ledger.get_or_create_account(provider, &config.share_asset)?;

    if receipt.amount_x > 0 {
        ledger.transfer(&user_x, &config.vault_x(), receipt.amount_x)?;
    }
    if receipt.amount_y > 0 {
        ledger.transfer(&user_y, &config.vault_y(), receipt.amount_y)?;
    }
    ledger.mint(&config_address, &config.share_asset, &user_shares, shares)?;

    Ok(receipt)
}
