use crate::error::ConfigError;
use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chain ids with bundled default configurations.
pub const CHAIN_ID_ETHEREUM: u64 = 1;
pub const CHAIN_ID_BASE: u64 = 8453;

/// Deployed infrastructure addresses and storage-layout constants for one
/// chain.
///
/// Everything in here is configuration, not protocol: if a contract is
/// redeployed with a different storage layout or address, the values must be
/// updated per deployment. The math and encoding modules never hardcode any
/// of these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Singleton pool manager holding all pool state.
    pub pool_manager: Address,
    /// Universal Router `execute` entry point.
    pub universal_router: Address,
    /// Permit2 intermediary approval contract.
    pub permit2: Address,
    /// Canonical wrapped native token.
    pub weth: Address,
    /// Hook contract attached to launchpad pools.
    pub hook: Address,
    /// Base slot index of the pool manager's internal `_pools` mapping.
    ///
    /// Reads return garbage (not an error) if this is wrong, so it is pinned
    /// by a golden-vector test against a known slot derivation.
    pub pools_slot: U256,
    /// Fee field value marking a dynamic-fee pool.
    pub dynamic_fee_flag: u32,
    /// Tick spacing used by launchpad pools on this chain.
    pub default_tick_spacing: i32,
}

impl ChainConfig {
    /// Base mainnet deployment.
    pub fn base() -> Self {
        Self {
            chain_id: CHAIN_ID_BASE,
            pool_manager: address!("0x498581fF718922c3f8e6A244956aF099B2652b2b"),
            universal_router: address!("0x6fF5693b99212Da76ad316178A184AB56D299b43"),
            permit2: address!("0x000000000022D473030F116dDEE9F6B43aC78BA3"),
            weth: address!("0x4200000000000000000000000000000000000006"),
            hook: address!("0x18aD8c9b72D33E69d8f02fDA61e3c7fAe4e728cc"),
            pools_slot: U256::from(6u64),
            dynamic_fee_flag: 0x800000,
            default_tick_spacing: 200,
        }
    }

    /// Ethereum mainnet deployment.
    pub fn ethereum() -> Self {
        Self {
            chain_id: CHAIN_ID_ETHEREUM,
            pool_manager: address!("0x000000000004444c5dc75cB358380D2e3dE08A90"),
            universal_router: address!("0x66a9893cC07D91D95644AEDD05D03f95e1dba8Af"),
            permit2: address!("0x000000000022D473030F116dDEE9F6B43aC78BA3"),
            weth: address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            hook: address!("0x9bEbE14d85375634c723EB5DC7B7E07C835dE8CC"),
            pools_slot: U256::from(6u64),
            dynamic_fee_flag: 0x800000,
            default_tick_spacing: 200,
        }
    }
}

/// Registry of per-chain configurations, keyed by chain id.
///
/// Lookups fail fast with [`ConfigError::UnsupportedChain`] before any
/// network call is made.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainConfig>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the Base and Ethereum mainnet deployments.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(ChainConfig::base());
        registry.insert(ChainConfig::ethereum());
        registry
    }

    pub fn insert(&mut self, config: ChainConfig) {
        self.chains.insert(config.chain_id, config);
    }

    pub fn get(&self, chain_id: u64) -> Result<&ChainConfig, ConfigError> {
        self.chains
            .get(&chain_id)
            .ok_or(ConfigError::UnsupportedChain(chain_id))
    }
}

/// Tunable policy knobs for quoting and swap submission.
///
/// The display haircut and the submission slippage serve different purposes
/// and are deliberately separate fields: the haircut pads the *shown*
/// estimate, the slippage bounds the *executed* minimum output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePolicy {
    /// Basis points shaved off the raw estimate before display.
    pub display_haircut_bps: u32,
    /// Basis points of slippage tolerated when deriving `amountOutMinimum`.
    pub slippage_bps: u32,
    /// Minimum interval between quote recomputations, for callers that
    /// debounce user input.
    pub debounce_ms: u64,
    /// Number of extra attempts after a failed storage read.
    pub read_retries: u32,
    /// Fixed delay between read attempts.
    pub retry_delay_ms: u64,
    /// Seconds added to the current time when no explicit deadline is given.
    pub deadline_secs: u64,
}

impl Default for QuotePolicy {
    fn default() -> Self {
        Self {
            display_haircut_bps: 200,
            slippage_bps: 1000,
            debounce_ms: 500,
            read_retries: 2,
            retry_delay_ms: 200,
            deadline_secs: 1800,
        }
    }
}
