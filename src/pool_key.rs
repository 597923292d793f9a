use crate::abi::SolPoolKey;
use crate::error::EncodeError;
use alloy_primitives::aliases::{I24, U24};
use alloy_primitives::{keccak256, Address, B256, U160};
use alloy_sol_types::SolValue;

/// Minimum valid tick spacing for a pool.
pub const MIN_TICK_SPACING: i32 = 1;
/// Maximum valid tick spacing for a pool.
pub const MAX_TICK_SPACING: i32 = 16383;
/// Maximum static LP fee, in hundredths of a bip (100%).
pub const MAX_LP_FEE: u32 = 1_000_000;

/// Identifies a pool inside the singleton pool manager.
///
/// `currency0` is always strictly less than `currency1` under numeric
/// comparison of the address bytes; [`PoolKey::try_new`] canonicalizes the
/// pair, so swapping the two inputs produces the identical key. Slot
/// derivation and swap direction both depend on this ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolKey {
    currency0: Address,
    currency1: Address,
    fee: u32,
    tick_spacing: I24,
    hooks: Address,
}

/// Converts an `Address` into its `U160` numeric representation for ordering.
#[inline(always)]
pub fn address_to_u160(address: Address) -> U160 {
    address.into()
}

/// Returns the currency pair sorted by numeric address value.
pub fn sort_currencies(a: Address, b: Address) -> (Address, Address) {
    if address_to_u160(a) < address_to_u160(b) {
        (a, b)
    } else {
        (b, a)
    }
}

impl PoolKey {
    /// Builds a validated, canonically ordered pool key.
    ///
    /// Rejects identical currencies, a fee that is neither the dynamic-fee
    /// flag nor within the static LP fee cap, and a tick spacing outside
    /// its bounded range.
    pub fn try_new(
        token_a: Address,
        token_b: Address,
        fee: u32,
        tick_spacing: i32,
        dynamic_fee_flag: u32,
        hooks: Address,
    ) -> Result<Self, EncodeError> {
        if token_a == token_b {
            return Err(EncodeError::IdenticalCurrencies);
        }
        if fee != dynamic_fee_flag && fee > MAX_LP_FEE {
            return Err(EncodeError::FeeOutOfBounds(fee));
        }
        if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing) {
            return Err(EncodeError::TickSpacingOutOfBounds(tick_spacing));
        }
        // convert once here so the ABI paths never carry a fallback
        let tick_spacing = I24::try_from(tick_spacing)
            .map_err(|_| EncodeError::TickSpacingOutOfBounds(tick_spacing))?;

        let (currency0, currency1) = sort_currencies(token_a, token_b);

        Ok(Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        })
    }

    pub fn currency0(&self) -> Address {
        self.currency0
    }

    pub fn currency1(&self) -> Address {
        self.currency1
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing.as_i32()
    }

    pub fn hooks(&self) -> Address {
        self.hooks
    }

    /// `true` when the given input currency is `currency0`, i.e. the swap
    /// moves currency0 into the pool and currency1 out.
    ///
    /// Getting this backwards silently swaps buy/sell semantics, so callers
    /// should derive it from the key rather than tracking it separately.
    pub fn zero_for_one(&self, token_in: Address) -> Result<bool, EncodeError> {
        if token_in == self.currency0 {
            Ok(true)
        } else if token_in == self.currency1 {
            Ok(false)
        } else {
            Err(EncodeError::CurrencyNotInPool)
        }
    }

    /// The output currency for a given swap direction.
    pub fn currency_out(&self, zero_for_one: bool) -> Address {
        if zero_for_one {
            self.currency1
        } else {
            self.currency0
        }
    }

    /// The input currency for a given swap direction.
    pub fn currency_in(&self, zero_for_one: bool) -> Address {
        if zero_for_one {
            self.currency0
        } else {
            self.currency1
        }
    }

    /// Deterministic pool identifier: `keccak256(abi.encode(poolKey))`,
    /// the lookup key into the pool manager's internal state.
    pub fn pool_id(&self) -> B256 {
        keccak256(self.to_sol().abi_encode())
    }

    /// The ABI-level struct used when this key appears inside calldata.
    pub(crate) fn to_sol(&self) -> SolPoolKey {
        SolPoolKey {
            currency0: self.currency0,
            currency1: self.currency1,
            fee: U24::from(self.fee),
            tickSpacing: self.tick_spacing,
            hooks: self.hooks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    const DYNAMIC_FEE_FLAG: u32 = 0x800000;

    fn launchpad_key() -> PoolKey {
        PoolKey::try_new(
            address!("0x3b68c3b4e22e35faf5841d1b5eef8404d5a3b663"),
            address!("0x4200000000000000000000000000000000000006"),
            DYNAMIC_FEE_FLAG,
            200,
            DYNAMIC_FEE_FLAG,
            address!("0x18ad8c9b72d33e69d8f02fda61e3c7fae4e728cc"),
        )
        .unwrap()
    }

    // ---------------- Canonicalization ----------------

    #[test]
    fn try_new_sorts_currencies_regardless_of_input_order() {
        let lo = address!("0x0000000000000000000000000000000000000001");
        let hi = address!("0x0000000000000000000000000000000000000002");
        let hooks = Address::ZERO;

        let a = PoolKey::try_new(lo, hi, 3000, 60, DYNAMIC_FEE_FLAG, hooks).unwrap();
        let b = PoolKey::try_new(hi, lo, 3000, 60, DYNAMIC_FEE_FLAG, hooks).unwrap();

        assert_eq!(a, b);
        assert!(address_to_u160(a.currency0()) < address_to_u160(a.currency1()));
    }

    #[test]
    fn try_new_rejects_identical_currencies() {
        let a = address!("0x0000000000000000000000000000000000000001");
        let err = PoolKey::try_new(a, a, 3000, 60, DYNAMIC_FEE_FLAG, Address::ZERO).unwrap_err();
        assert!(matches!(err, EncodeError::IdenticalCurrencies));
    }

    #[test]
    fn try_new_rejects_out_of_range_tick_spacing() {
        let lo = address!("0x0000000000000000000000000000000000000001");
        let hi = address!("0x0000000000000000000000000000000000000002");

        for spacing in [0, -1, MAX_TICK_SPACING + 1] {
            let err = PoolKey::try_new(lo, hi, 3000, spacing, DYNAMIC_FEE_FLAG, Address::ZERO)
                .unwrap_err();
            assert!(matches!(err, EncodeError::TickSpacingOutOfBounds(s) if s == spacing));
        }
    }

    #[test]
    fn try_new_accepts_dynamic_fee_flag_but_rejects_oversized_static_fee() {
        let lo = address!("0x0000000000000000000000000000000000000001");
        let hi = address!("0x0000000000000000000000000000000000000002");

        assert!(
            PoolKey::try_new(lo, hi, DYNAMIC_FEE_FLAG, 200, DYNAMIC_FEE_FLAG, Address::ZERO)
                .is_ok()
        );

        let err = PoolKey::try_new(
            lo,
            hi,
            MAX_LP_FEE + 1,
            200,
            DYNAMIC_FEE_FLAG,
            Address::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, EncodeError::FeeOutOfBounds(_)));
    }

    // ---------------- Direction ----------------

    #[test]
    fn zero_for_one_follows_canonical_ordering() {
        let key = launchpad_key();

        // token (currency0) in -> selling into WETH
        assert!(key.zero_for_one(key.currency0()).unwrap());
        // WETH (currency1) in -> buying the token
        assert!(!key.zero_for_one(key.currency1()).unwrap());

        let stranger = address!("0x00000000000000000000000000000000deadbeef");
        assert!(matches!(
            key.zero_for_one(stranger).unwrap_err(),
            EncodeError::CurrencyNotInPool
        ));
    }

    #[test]
    fn tick_spacing_survives_abi_conversion_exactly() {
        let key = launchpad_key();
        assert_eq!(key.tick_spacing(), 200);
        assert_eq!(key.to_sol().tickSpacing, I24::try_from(200).unwrap());
    }

    // ---------------- Pool id ----------------

    #[test]
    fn pool_id_matches_known_deployment() {
        // keccak256(abi.encode(key)) for the launchpad pool on Base,
        // cross-checked against an independent encoder.
        let expected =
            b256!("0x34fc0d2eb125338f44d3001c5a5fd626aad60d98b763082b7fbdec8a6d501f30");
        assert_eq!(launchpad_key().pool_id(), expected);
    }

    #[test]
    fn pool_id_is_order_insensitive() {
        let key = launchpad_key();
        let flipped = PoolKey::try_new(
            key.currency1(),
            key.currency0(),
            key.fee(),
            key.tick_spacing(),
            DYNAMIC_FEE_FLAG,
            key.hooks(),
        )
        .unwrap();
        assert_eq!(key.pool_id(), flipped.pool_id());
    }
}
