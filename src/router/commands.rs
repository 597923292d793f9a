use crate::error::EncodeError;
use crate::pool_key::PoolKey;
use alloy_primitives::{address, uint, Address, Bytes, U160, U256};
use alloy_sol_types::SolValue;

/// Recipient placeholder the router resolves to its own address, used to
/// keep wrapped funds inside the router between commands.
pub const ADDRESS_THIS: Address = address!("0x0000000000000000000000000000000000000002");

/// Lowest usable sqrt price limit (`MIN_SQRT_PRICE + 1`).
pub const MIN_SQRT_PRICE_LIMIT: U160 = uint!(4295128740_U160);
/// Highest usable sqrt price limit, just under the protocol maximum.
pub const MAX_SQRT_PRICE_LIMIT: U160 =
    uint!(1461446703485210103287273052203988822378723970340_U160);

/// Universal Router command opcodes.
///
/// One byte per command in the top-level `commands` string; the router
/// interprets them sequentially, so order encodes control flow.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Wrap attached native currency into WETH held by the router.
    WrapEth = 0x0b,
    /// Execute a batch of V4 pool actions.
    V4Swap = 0x10,
}

/// Action opcodes inside a `V4Swap` command's nested `actions` string.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum V4Action {
    /// Exact-input swap through a single pool.
    SwapExactInSingle = 0x06,
    /// Settle the full amount owed to the pool in one currency.
    SettleAll = 0x0c,
    /// Settle both currencies of a pair.
    SettlePair = 0x0d,
    /// Take the full amount owed from the pool in one currency.
    TakeAll = 0x0f,
    /// Take both currencies of a pair to a recipient.
    TakePair = 0x11,
}

fn to_u128(amount: U256) -> Result<u128, EncodeError> {
    u128::try_from(amount).map_err(|_| EncodeError::AmountOverflow { width: 128 })
}

fn to_i128_exact_in(amount: U256) -> Result<i128, EncodeError> {
    // positive int128 marks an exact-input swap, so only 127 bits are usable
    i128::try_from(to_u128(amount)?).map_err(|_| EncodeError::AmountOverflow { width: 128 })
}

/// Parameters for `Command::WrapEth`: `(address recipient, uint256 amount)`.
pub fn encode_wrap_eth(recipient: Address, amount: U256) -> Bytes {
    (recipient, amount).abi_encode_params().into()
}

/// An ordered batch of V4 actions plus their parameter blobs, building the
/// `(bytes actions, bytes[] params)` input of a `V4Swap` command.
///
/// Field order inside every tuple matches the router ABI exactly; the
/// golden-vector tests below pin the byte layout.
#[derive(Clone, Debug, Default)]
pub struct V4ActionBatch {
    actions: Vec<u8>,
    params: Vec<Bytes>,
}

impl V4ActionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// `SwapExactInSingle`: `((PoolKey), bool zeroForOne,
    /// int128 amountSpecified, uint128 amountOutMinimum,
    /// uint160 sqrtPriceLimitX96, bytes hookData)`.
    ///
    /// The sqrt price limit is picked from the direction: a zero-for-one
    /// swap pushes the price down toward the minimum, the reverse pushes it
    /// up toward the maximum.
    pub fn swap_exact_in_single(
        mut self,
        key: &PoolKey,
        zero_for_one: bool,
        amount_in: U256,
        amount_out_minimum: U256,
        hook_data: Bytes,
    ) -> Result<Self, EncodeError> {
        if amount_in.is_zero() {
            return Err(EncodeError::ZeroAmount);
        }
        let amount_specified = to_i128_exact_in(amount_in)?;
        let min_out = to_u128(amount_out_minimum)?;
        let sqrt_price_limit = if zero_for_one {
            MIN_SQRT_PRICE_LIMIT
        } else {
            MAX_SQRT_PRICE_LIMIT
        };

        let blob = (
            key.to_sol(),
            zero_for_one,
            amount_specified,
            min_out,
            sqrt_price_limit,
            hook_data,
        )
            .abi_encode_params();

        self.actions.push(V4Action::SwapExactInSingle as u8);
        self.params.push(blob.into());
        Ok(self)
    }

    /// `SettleAll`: `(address currency, uint128 maxAmount)`.
    pub fn settle_all(mut self, currency: Address, max_amount: U256) -> Result<Self, EncodeError> {
        let max_amount = to_u128(max_amount)?;
        self.actions.push(V4Action::SettleAll as u8);
        self.params
            .push((currency, max_amount).abi_encode_params().into());
        Ok(self)
    }

    /// `TakeAll`: `(address currency, uint128 minAmount)`.
    pub fn take_all(mut self, currency: Address, min_amount: U256) -> Result<Self, EncodeError> {
        let min_amount = to_u128(min_amount)?;
        self.actions.push(V4Action::TakeAll as u8);
        self.params
            .push((currency, min_amount).abi_encode_params().into());
        Ok(self)
    }

    /// `SettlePair`: `(address currency0, address currency1)`.
    pub fn settle_pair(mut self, currency0: Address, currency1: Address) -> Self {
        self.actions.push(V4Action::SettlePair as u8);
        self.params
            .push((currency0, currency1).abi_encode_params().into());
        self
    }

    /// `TakePair`: `(address currency0, address currency1,
    /// address recipient)`.
    pub fn take_pair(mut self, currency0: Address, currency1: Address, recipient: Address) -> Self {
        self.actions.push(V4Action::TakePair as u8);
        self.params
            .push((currency0, currency1, recipient).abi_encode_params().into());
        self
    }

    /// ABI-encodes the batch as `(bytes actions, bytes[] params)`.
    pub fn encode(&self) -> Bytes {
        (Bytes::from(self.actions.clone()), self.params.clone())
            .abi_encode_params()
            .into()
    }
}
