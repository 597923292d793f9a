//! Quotes and Universal Router calldata for Uniswap V4 launchpad pools.
//!
//! This crate exposes:
//! - Q64.96 price math (`math::*`) for spot quotes from a pool's sqrt price.
//! - Pool identification (`PoolKey`) and singleton storage-slot derivation
//!   (`slot::*`) for reading pool state through `extsload`.
//! - A `QuoteEngine` that turns one raw storage read into a quote.
//! - A `SwapEncoder` producing ready-to-sign `execute` calldata for buys
//!   (native wrap + swap) and sells (Permit2-backed).
//! - A `SwapSequencer` that orders the two Permit2 approvals ahead of a sell.
//!
//! # Examples
//!
//! ## Pure math
//! ```
//! use v4_swap_client::math::{amount_out_from_sqrt_price, Q96};
//! use v4_swap_client::U256;
//!
//! // at the 1:1 price, one unit in is one unit out
//! let out = amount_out_from_sqrt_price(Q96, U256::from(1_000u64), true).unwrap();
//! assert_eq!(out, U256::from(1_000u64));
//! ```
//!
//! ## Encoding a native-currency buy
//! ```
//! use v4_swap_client::{ChainConfig, PoolKey, SwapEncoder, SwapIntent, U256};
//! use alloy_primitives::{address, Bytes};
//!
//! let config = ChainConfig::base();
//! let key = PoolKey::try_new(
//!     address!("0x3b68c3b4e22e35faf5841d1b5eef8404d5a3b663"),
//!     config.weth,
//!     config.dynamic_fee_flag,
//!     config.default_tick_spacing,
//!     config.dynamic_fee_flag,
//!     config.hook,
//! )?;
//!
//! let plan = SwapEncoder::new(&config).buy_with_native(&SwapIntent {
//!     pool_key: key,
//!     token_in: config.weth,
//!     amount_in: U256::from(1_000_000_000_000_000u64), // 0.001 ether
//!     min_amount_out: U256::from(1u64),
//!     deadline: 1_900_000_000,
//!     hook_data: Bytes::new(),
//! })?;
//!
//! assert_eq!(plan.commands.as_ref(), &[0x0b, 0x10]); // WRAP_ETH, V4_SWAP
//! assert_eq!(plan.value, U256::from(1_000_000_000_000_000u64));
//! # Ok::<(), v4_swap_client::Error>(())
//! ```

pub use alloy_primitives::{Address, B256, U256};

pub mod abi;
pub mod approval;
pub mod config;
pub mod error;
pub mod math;
pub mod pool_key;
pub mod quote;
pub mod router;
pub mod slot;

pub use approval::{FailedStep, SwapSequencer, SwapStage};
pub use config::{ChainConfig, ChainRegistry, QuotePolicy};
pub use error::Error;
pub use math::{Q96, RESOLUTION};
pub use pool_key::PoolKey;
pub use quote::{OnchainProvider, Quote, QuoteEngine, QuoteSequence};
pub use router::{RouterPlan, SwapEncoder, SwapIntent, TransactionSpec};
pub use slot::{pool_state_slot, PoolState};
