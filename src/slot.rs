use alloy_primitives::{keccak256, B256, U256};
use alloy_sol_types::SolValue;

/// Mask selecting the low 160 bits of a storage word.
const SQRT_PRICE_MASK: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0xFFFF_FFFF, 0]);
const U24_MASK: u64 = 0xFF_FFFF;

/// Computes the storage slot of a pool's packed state word inside the
/// singleton pool manager.
///
/// Replicates Solidity's mapping layout for `mapping(bytes32 => Pool.State)`
/// at declared slot `pools_slot`: `keccak256(abi.encode(poolId, pools_slot))`.
/// A wrong `pools_slot` still yields a successful read of an unrelated
/// (usually zero) word, which is why the constant lives in [`ChainConfig`]
/// and is pinned by a golden vector below.
///
/// [`ChainConfig`]: crate::config::ChainConfig
pub fn pool_state_slot(pool_id: B256, pools_slot: U256) -> B256 {
    keccak256((pool_id, pools_slot).abi_encode())
}

/// Decoded view of the packed `slot0` word a pool manager stores per pool.
///
/// Layout, low bits first: `uint160 sqrtPriceX96 | int24 tick |
/// uint24 protocolFee | uint24 lpFee`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub protocol_fee: u32,
    pub lp_fee: u32,
}

impl PoolState {
    /// Unpacks a raw storage word.
    ///
    /// The sqrt price is masked out of the low 160 bits rather than assuming
    /// the upper bits are zero; the tick is sign-extended from 24 bits.
    pub fn from_word(word: B256) -> Self {
        let value = U256::from_be_bytes(word.0);

        let sqrt_price_x96 = value & SQRT_PRICE_MASK;

        let tick_bits = ((value >> 160usize).as_limbs()[0] & U24_MASK) as u32;
        let tick = if tick_bits & 0x80_0000 != 0 {
            tick_bits as i32 - (1 << 24)
        } else {
            tick_bits as i32
        };

        let protocol_fee = ((value >> 184usize).as_limbs()[0] & U24_MASK) as u32;
        let lp_fee = ((value >> 208usize).as_limbs()[0] & U24_MASK) as u32;

        Self {
            sqrt_price_x96,
            tick,
            protocol_fee,
            lp_fee,
        }
    }

    /// A zero sqrt price marks a pool that was never initialized.
    pub fn is_initialized(&self) -> bool {
        !self.sqrt_price_x96.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use std::str::FromStr;

    const LAUNCHPAD_POOL_ID: B256 =
        b256!("0x34fc0d2eb125338f44d3001c5a5fd626aad60d98b763082b7fbdec8a6d501f30");

    // ---------------- Slot derivation ----------------

    #[test]
    fn state_slot_matches_known_deployment_vector() {
        let slot = pool_state_slot(LAUNCHPAD_POOL_ID, U256::from(6u64));
        assert_eq!(
            slot,
            b256!("0x3e1bfaae133177ad164dfb8bab3d7e6758007e5f033c4e5591444e3393d450ea")
        );
    }

    #[test]
    fn state_slot_for_zero_pool_id() {
        let slot = pool_state_slot(B256::ZERO, U256::from(6u64));
        assert_eq!(
            slot,
            b256!("0x54cdd369e4e8a8515e52ca72ec816c2101831ad1f18bf44102ed171459c9b4f8")
        );
    }

    #[test]
    fn state_slot_is_deterministic_and_input_sensitive() {
        let a = pool_state_slot(LAUNCHPAD_POOL_ID, U256::from(6u64));
        let b = pool_state_slot(LAUNCHPAD_POOL_ID, U256::from(6u64));
        assert_eq!(a, b);

        // base slot index is part of the preimage
        let c = pool_state_slot(LAUNCHPAD_POOL_ID, U256::from(7u64));
        assert_ne!(a, c);
    }

    #[test]
    fn state_slot_matches_manual_preimage() {
        // second construction path: raw byte concatenation of
        // poolId ++ pad32(poolsSlot)
        let mut preimage = [0u8; 64];
        preimage[..32].copy_from_slice(LAUNCHPAD_POOL_ID.as_slice());
        preimage[32..].copy_from_slice(&U256::from(6u64).to_be_bytes::<32>());
        assert_eq!(
            pool_state_slot(LAUNCHPAD_POOL_ID, U256::from(6u64)),
            keccak256(preimage)
        );
    }

    // ---------------- Word decoding ----------------

    #[test]
    fn decodes_packed_word_with_negative_tick() {
        // sqrtPrice = 4436291582240826969633872, tick = -195836,
        // protocolFee = 0, lpFee = 0x800000
        let word =
            b256!("0x000000800000000000fd030400000000000000000003ab6bd93b5fdf746d3450");
        let state = PoolState::from_word(word);

        assert_eq!(
            state.sqrt_price_x96,
            U256::from_str("4436291582240826969633872").unwrap()
        );
        assert_eq!(state.tick, -195836);
        assert_eq!(state.protocol_fee, 0);
        assert_eq!(state.lp_fee, 0x800000);
        assert!(state.is_initialized());
    }

    #[test]
    fn masks_sqrt_price_instead_of_trusting_upper_bits() {
        // upper fields populated, price field zero
        let word =
            b256!("0x000000000000000000fd03040000000000000000000000000000000000000000");
        let state = PoolState::from_word(word);

        assert_eq!(state.sqrt_price_x96, U256::ZERO);
        assert_eq!(state.tick, -195836);
        assert!(!state.is_initialized());
    }

    #[test]
    fn positive_tick_is_not_sign_extended() {
        // tick = 0x0000c8 = 200 just above the price field
        let mut value = U256::from(1u64);
        value |= U256::from(200u64) << 160usize;
        let state = PoolState::from_word(B256::from(value.to_be_bytes::<32>()));
        assert_eq!(state.tick, 200);
        assert_eq!(state.sqrt_price_x96, U256::from(1u64));
    }

    #[test]
    fn unpacks_every_field_at_its_bit_offset() {
        let mut value = U256::from(1u64);
        value |= U256::from(100u64) << 160usize; // tick
        value |= U256::from(3000u64) << 184usize; // protocol fee
        value |= U256::from(500u64) << 208usize; // lp fee
        let state = PoolState::from_word(B256::from(value.to_be_bytes::<32>()));

        assert_eq!(state.sqrt_price_x96, U256::from(1u64));
        assert_eq!(state.tick, 100);
        assert_eq!(state.protocol_fee, 3000);
        assert_eq!(state.lp_fee, 500);
    }

    #[test]
    fn zero_word_is_uninitialized() {
        let state = PoolState::from_word(B256::ZERO);
        assert!(!state.is_initialized());
        assert_eq!(state.tick, 0);
    }
}
