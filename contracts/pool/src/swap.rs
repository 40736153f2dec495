//! Exact-input swap
//!
//! Fee-on-input constant product pricing. The full input lands in the
//! input vault, so the fee stays in the pool and accrues pro rata to
//! every share holder.
//!
//! ## Invariant
//!
//! `(reserve_in + amount_in) * (reserve_out - amount_out) >= reserve_in * reserve_out`
//!
//! Holds by construction of the floor-rounded output; it is re-checked
//! before any funds move.

use cpamm_common::{
    errors::{AmmError, AmmResult},
    ledger::Ledger,
    math::verify_product_growth,
    types::{Address, PoolConfig, PoolSnapshot, SwapDirection, SwapReceipt},
};

use crate::quote::{quote_swap, read_snapshot};

/// Reject bad arguments before any state is read
pub fn validate_args(amount_in: u64) -> AmmResult<()> {
    if amount_in == 0 {
        return Err(AmmError::ZeroAmount);
    }
    Ok(())
}

/// Price a swap against `snapshot`, enforcing `min_out` and the product check
pub fn plan(
    snapshot: &PoolSnapshot,
    fee_bps: u16,
    direction: SwapDirection,
    amount_in: u64,
    min_out: u64,
) -> AmmResult<SwapReceipt> {
    let quote = quote_swap(snapshot, fee_bps, direction, amount_in)?;
    if quote.amount_out < min_out {
        return Err(AmmError::SlippageExceeded {
            amount: quote.amount_out,
            limit: min_out,
        });
    }

    let (reserve_in, reserve_out) = snapshot.reserves_for(direction);
    verify_product_growth(reserve_in, reserve_out, amount_in, quote.amount_out)?;

    Ok(SwapReceipt {
        direction,
        amount_in,
        fee_amount: quote.fee_amount,
        amount_out: quote.amount_out,
    })
}

/// Take `amount_in` from `trader` and pay the priced output
pub fn execute<L: Ledger>(
    ledger: &mut L,
    config: &PoolConfig,
    trader: &Address,
    direction: SwapDirection,
    amount_in: u64,
    min_out: u64,
) -> AmmResult<SwapReceipt> {
    // 1. Locked pools do not trade
    if config.locked {
        return Err(AmmError::PoolLocked);
    }

    // 2. Price against current reserves
    let snapshot = read_snapshot(ledger, config)?;
    let receipt = plan(&snapshot, config.fee_bps, direction, amount_in, min_out)?;

    // 3. Input in full, then output
    let (asset_in, asset_out) = config.swap_assets(direction);
    let (vault_in, vault_out) = match direction {
        SwapDirection::XToY => (config.vault_x(), config.vault_y()),
        SwapDirection::YToX => (config.vault_y(), config.vault_x()),
    };

    let user_in = ledger.get_or_create_account(trader, &asset_in)?;
    ledger.transfer(&user_in, &vault_in, amount_in)?;

    if receipt.amount_out > 0 {
        let user_out = ledger.get_or_create_account(trader, &asset_out)?;
        ledger.transfer(&vault_out, &user_out, receipt.amount_out)?;
    }

    Ok(receipt)
}
