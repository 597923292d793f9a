pub mod full_math;
pub mod price_math;

pub use full_math::mul_div;
pub use price_math::{amount_out_from_sqrt_price, apply_bps_discount, Q96, RESOLUTION};
