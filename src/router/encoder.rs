use crate::abi::IUniversalRouter;
use crate::config::ChainConfig;
use crate::error::EncodeError;
use crate::pool_key::PoolKey;
use crate::router::commands::{encode_wrap_eth, Command, V4ActionBatch, ADDRESS_THIS};
use crate::router::TransactionSpec;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

/// A user's requested swap, consumed into calldata and never persisted.
#[derive(Clone, Debug)]
pub struct SwapIntent {
    pub pool_key: PoolKey,
    /// The currency being paid in; direction is derived from the key's
    /// canonical ordering, never supplied separately.
    pub token_in: Address,
    pub amount_in: U256,
    /// Slippage bound enforced on-chain via `amountOutMinimum`.
    pub min_amount_out: U256,
    /// Unix timestamp after which the router rejects the transaction.
    pub deadline: u64,
    pub hook_data: Bytes,
}

/// The `(commands, inputs)` pair for one router `execute` call, plus the
/// native value to attach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterPlan {
    pub router: Address,
    pub commands: Bytes,
    pub inputs: Vec<Bytes>,
    pub value: U256,
    pub deadline: U256,
}

impl RouterPlan {
    /// Full `execute(bytes,bytes[],uint256)` calldata.
    pub fn calldata(&self) -> Bytes {
        IUniversalRouter::executeCall {
            commands: self.commands.clone(),
            inputs: self.inputs.clone(),
            deadline: self.deadline,
        }
        .abi_encode()
        .into()
    }

    /// The plan as a ready-to-sign transaction.
    pub fn transaction(&self) -> TransactionSpec {
        TransactionSpec {
            to: self.router,
            input: self.calldata(),
            value: self.value,
        }
    }
}

/// Builds Universal Router plans for launchpad swaps.
#[derive(Clone, Debug)]
pub struct SwapEncoder {
    router: Address,
    weth: Address,
}

impl SwapEncoder {
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            router: config.universal_router,
            weth: config.weth,
        }
    }

    /// Buy plan: attach native currency, wrap it inside the router, then
    /// swap WETH for the pool's other currency in one atomic transaction.
    ///
    /// Commands: `WRAP_ETH` then `V4_SWAP`; actions: exact-in swap,
    /// settle WETH from the router's wrapped balance, take the token to
    /// the caller.
    pub fn buy_with_native(&self, intent: &SwapIntent) -> Result<RouterPlan, EncodeError> {
        if intent.amount_in.is_zero() {
            return Err(EncodeError::ZeroAmount);
        }
        let zero_for_one = intent.pool_key.zero_for_one(self.weth)?;
        let currency_out = intent.pool_key.currency_out(zero_for_one);

        let wrap_input = encode_wrap_eth(ADDRESS_THIS, intent.amount_in);

        let batch = V4ActionBatch::new()
            .swap_exact_in_single(
                &intent.pool_key,
                zero_for_one,
                intent.amount_in,
                intent.min_amount_out,
                intent.hook_data.clone(),
            )?
            .settle_all(self.weth, U256::from(u128::MAX))?
            .take_all(currency_out, intent.min_amount_out)?;

        Ok(RouterPlan {
            router: self.router,
            commands: Bytes::from(vec![Command::WrapEth as u8, Command::V4Swap as u8]),
            inputs: vec![wrap_input, batch.encode()],
            value: intent.amount_in,
            deadline: U256::from(intent.deadline),
        })
    }

    /// Sell plan: swap the launchpad token for WETH.
    ///
    /// A single `V4_SWAP` command; the input token is pulled through
    /// Permit2, so the approval sequence must have completed first (see
    /// [`SwapSequencer`]). No native value is attached.
    ///
    /// [`SwapSequencer`]: crate::approval::SwapSequencer
    pub fn sell_token(&self, intent: &SwapIntent) -> Result<RouterPlan, EncodeError> {
        if intent.amount_in.is_zero() {
            return Err(EncodeError::ZeroAmount);
        }
        let zero_for_one = intent.pool_key.zero_for_one(intent.token_in)?;
        let currency_out = intent.pool_key.currency_out(zero_for_one);

        let batch = V4ActionBatch::new()
            .swap_exact_in_single(
                &intent.pool_key,
                zero_for_one,
                intent.amount_in,
                intent.min_amount_out,
                intent.hook_data.clone(),
            )?
            .settle_all(intent.token_in, U256::from(u128::MAX))?
            .take_all(currency_out, intent.min_amount_out)?;

        Ok(RouterPlan {
            router: self.router,
            commands: Bytes::from(vec![Command::V4Swap as u8]),
            inputs: vec![batch.encode()],
            value: U256::ZERO,
            deadline: U256::from(intent.deadline),
        })
    }
}
