//! Mathematical Utilities for the Pool Engine
//!
//! Share math and swap pricing. All products and sums are computed in
//! u128 with checked operations; results are narrowed to u64 only after
//! the final division, and only when they fit.
//!
//! Rounding always favours the pool:
//! - deposit amounts round **up** (new holders cannot dilute old ones)
//! - withdraw amounts round **down** (leaving holders keep the dust)
//! - swap output rounds **down** and the fee rounds **down** on the input

use crate::constants::fees;
use crate::errors::{AmmError, AmmResult};

/// Outcome of pricing an exact-input swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// floor(amount_in * fee_bps / 10000)
    pub fee_amount: u64,
    /// amount_in - fee_amount
    pub amount_in_after_fee: u64,
    /// Amount paid out of the output reserve
    pub amount_out: u64,
}

/// floor(a * b / c)
pub fn mul_div_floor(a: u64, b: u64, c: u64) -> AmmResult<u64> {
    if c == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = safe_mul(a, b)?;
    narrow(product / c as u128)
}

/// ceil(a * b / c)
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> AmmResult<u64> {
    if c == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = safe_mul(a, b)?;
    let divisor = c as u128;
    let quotient = product / divisor;
    let rounded = if product % divisor == 0 {
        quotient
    } else {
        quotient.checked_add(1).ok_or(AmmError::Overflow)?
    };
    narrow(rounded)
}

/// Fee withheld from a swap input
///
/// fee = floor(amount * fee_bps / 10000)
pub fn calculate_fee(amount: u64, fee_bps: u16) -> AmmResult<u64> {
    mul_div_floor(amount, fee_bps as u64, fees::BPS_DENOMINATOR)
}

/// Price an exact-input swap against `reserve_in`/`reserve_out`
///
/// ```text
/// fee   = floor(a * fee_bps / 10000)
/// a_eff = a - fee
/// out   = floor(a_eff * reserve_out / (reserve_in + a_eff))
/// ```
pub fn calculate_swap_output(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u16,
) -> AmmResult<SwapQuote> {
    let fee_amount = calculate_fee(amount_in, fee_bps)?;
    let amount_in_after_fee = safe_sub(amount_in, fee_amount)?;

    let numerator = safe_mul(amount_in_after_fee, reserve_out)?;
    let denominator = (reserve_in as u128)
        .checked_add(amount_in_after_fee as u128)
        .ok_or(AmmError::Overflow)?;
    if denominator == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let amount_out = narrow(numerator / denominator)?;

    Ok(SwapQuote {
        fee_amount,
        amount_in_after_fee,
        amount_out,
    })
}

/// Reserve amounts required to mint `shares` into a live pool
///
/// x = ceil(shares * reserve_x / supply), y likewise
pub fn calculate_deposit_amounts(
    shares: u64,
    reserve_x: u64,
    reserve_y: u64,
    supply: u64,
) -> AmmResult<(u64, u64)> {
    let x = mul_div_ceil(shares, reserve_x, supply)?;
    let y = mul_div_ceil(shares, reserve_y, supply)?;
    Ok((x, y))
}

/// Reserve amounts released by burning `shares`
///
/// x = floor(shares * reserve_x / supply), y likewise
pub fn calculate_withdraw_amounts(
    shares: u64,
    reserve_x: u64,
    reserve_y: u64,
    supply: u64,
) -> AmmResult<(u64, u64)> {
    let x = mul_div_floor(shares, reserve_x, supply)?;
    let y = mul_div_floor(shares, reserve_y, supply)?;
    Ok((x, y))
}

/// Constant product of two reserves
pub fn constant_product(reserve_x: u64, reserve_y: u64) -> u128 {
    // u64 * u64 always fits in u128
    reserve_x as u128 * reserve_y as u128
}

/// Check that `(reserve_in + amount_in) * (reserve_out - amount_out)`
/// is not below the pre-trade product
pub fn verify_product_growth(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    amount_out: u64,
) -> AmmResult<u128> {
    let old_k = constant_product(reserve_in, reserve_out);
    let new_in = safe_add(reserve_in, amount_in)?;
    let new_out = safe_sub(reserve_out, amount_out)?;
    let new_k = constant_product(new_in, new_out);
    if new_k < old_k {
        return Err(AmmError::InvariantViolation { old_k, new_k });
    }
    Ok(new_k)
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> AmmResult<u64> {
    a.checked_add(b).ok_or(AmmError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u64, b: u64) -> AmmResult<u64> {
    a.checked_sub(b).ok_or(AmmError::Underflow)
}

/// Safe multiplication into u128
pub fn safe_mul(a: u64, b: u64) -> AmmResult<u128> {
    (a as u128).checked_mul(b as u128).ok_or(AmmError::Overflow)
}

fn narrow(value: u128) -> AmmResult<u64> {
    u64::try_from(value).map_err(|_| AmmError::Overflow)
}
