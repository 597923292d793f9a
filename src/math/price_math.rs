use crate::error::MathError;
use crate::math::full_math::mul_div;
use alloy_primitives::ruint::Uint;
use alloy_primitives::U256;

/// Fixed-point resolution of the sqrt price: prices are scaled by 2^96.
pub const RESOLUTION: u32 = 96;

/// 2^96 as a `U256`.
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// Basis-point denominator used by the policy helpers.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Wide intermediate for `amount * sqrtPrice^2`: 256 + 160 + 160 bits
/// never exceeds 768.
type U768 = Uint<768, 12>;

fn widen(x: U256) -> U768 {
    let mut limbs = [0u64; 12];
    limbs[..4].copy_from_slice(x.as_limbs());
    U768::from_limbs(limbs)
}

fn narrow(x: U768) -> Result<U256, MathError> {
    let limbs = x.as_limbs();
    if limbs[4..].iter().any(|&l| l != 0) {
        return Err(MathError::Overflow);
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Estimates the output amount for an input amount at the pool's current
/// sqrt price (Q64.96), ignoring price impact.
///
/// Under the v3/v4 convention the price of currency0 denominated in
/// currency1 is `(sqrtPriceX96 / 2^96)^2`, so:
///
/// - `zero_for_one` (currency0 in, currency1 out):
///   `amountOut = amountIn * sqrtPriceX96^2 / 2^192`
/// - otherwise (currency1 in, currency0 out):
///   `amountOut = amountIn * 2^192 / sqrtPriceX96^2`
///
/// The full product is carried in a 768-bit intermediate, so the result is
/// the exact floor of the rational value. This is a display/slippage-bound
/// estimate only; the chain enforces the true curve.
///
/// A zero `sqrt_price_x96` means the pool was never initialized; callers
/// must reject it before reaching this function, and the division path
/// returns `MathError::DivisionByZero` rather than computing anything.
pub fn amount_out_from_sqrt_price(
    sqrt_price_x96: U256,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, MathError> {
    if sqrt_price_x96.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let price = widen(sqrt_price_x96)
        .checked_mul(widen(sqrt_price_x96))
        .ok_or(MathError::Overflow)?;
    let q192 = widen(Q96)
        .checked_mul(widen(Q96))
        .ok_or(MathError::Overflow)?;

    let (numerator, denominator) = if zero_for_one {
        (price, q192)
    } else {
        (q192, price)
    };

    let product = widen(amount_in)
        .checked_mul(numerator)
        .ok_or(MathError::Overflow)?;

    narrow(product / denominator)
}

/// Shaves `bps` basis points off `amount`, flooring the result.
///
/// Used both for the display haircut on quotes and for deriving the
/// minimum-output bound from a quote at submission time.
pub fn apply_bps_discount(amount: U256, bps: u32) -> Result<U256, MathError> {
    if bps > BPS_DENOMINATOR {
        return Err(MathError::Overflow);
    }
    mul_div(
        amount,
        U256::from(BPS_DENOMINATOR - bps),
        U256::from(BPS_DENOMINATOR),
    )
}
