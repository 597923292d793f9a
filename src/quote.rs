use crate::abi::IExtsload;
use crate::config::{ChainConfig, QuotePolicy};
use crate::error::{MathError, QuoteError};
use crate::math::price_math::{amount_out_from_sqrt_price, apply_bps_discount};
use crate::slot::{pool_state_slot, PoolState};
use alloy_primitives::{B256, U256};
use alloy_provider::Provider;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub type OnchainProvider<P> = Arc<P>;

/// A quote produced from a single raw storage read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quote {
    /// Exact floor estimate at the current sqrt price, no adjustments.
    pub amount_out: U256,
    /// Estimate after the policy's display haircut.
    pub display_amount_out: U256,
    /// Decoded pool state the quote was computed from.
    pub state: PoolState,
}

impl Quote {
    /// The haircut estimate rendered in whole-token units (18 decimals),
    /// ready for display.
    pub fn display_amount_ether(&self) -> String {
        alloy_primitives::utils::format_ether(self.display_amount_out)
    }
}

/// Computes output estimates for a pool by reading its packed state word
/// straight out of the pool manager's storage.
///
/// One `extsload` call per quote; no caching here. If a caller wants a
/// read-through cache it belongs in the provider layer, injected, so this
/// engine stays testable without global setup.
#[derive(Clone, Debug)]
pub struct QuoteEngine<P> {
    manager: IExtsload::IExtsloadInstance<OnchainProvider<P>>,
    pools_slot: U256,
    policy: QuotePolicy,
}

impl<P> QuoteEngine<P>
where
    P: Provider + Send + Sync + 'static,
{
    /// Binds the engine to the chain's pool manager.
    pub fn new(config: &ChainConfig, policy: QuotePolicy, provider: OnchainProvider<P>) -> Self {
        Self {
            manager: IExtsload::IExtsloadInstance::new(config.pool_manager, provider),
            pools_slot: config.pools_slot,
            policy,
        }
    }

    pub fn policy(&self) -> &QuotePolicy {
        &self.policy
    }

    /// Reads the pool's packed state word, retrying failed reads a fixed
    /// number of times with a fixed delay.
    pub async fn fetch_pool_state(&self, pool_id: B256) -> Result<PoolState, QuoteError> {
        let slot = pool_state_slot(pool_id, self.pools_slot);

        let mut attempt = 0u32;
        let word = loop {
            match self.manager.extsload(slot).call().await {
                Ok(word) => break word,
                Err(e) if attempt < self.policy.read_retries => {
                    attempt += 1;
                    warn!(%pool_id, attempt, error = %e, "storage read failed, retrying");
                    tokio::time::sleep(Duration::from_millis(self.policy.retry_delay_ms)).await;
                }
                Err(e) => return Err(QuoteError::ReadFailed(e.to_string())),
            }
        };

        if word == B256::ZERO {
            return Err(QuoteError::PoolUninitialized);
        }

        let state = PoolState::from_word(word);
        if !state.is_initialized() {
            return Err(QuoteError::InvalidPoolState);
        }

        Ok(state)
    }

    /// Quotes `amount_in` of the input currency against the pool.
    ///
    /// `zero_for_one` selects the direction relative to the pool key's
    /// canonical ordering; see [`PoolKey::zero_for_one`].
    ///
    /// [`PoolKey::zero_for_one`]: crate::pool_key::PoolKey::zero_for_one
    pub async fn quote(
        &self,
        pool_id: B256,
        amount_in: U256,
        zero_for_one: bool,
    ) -> Result<Quote, QuoteError> {
        let state = self.fetch_pool_state(pool_id).await?;

        let amount_out = amount_out_from_sqrt_price(state.sqrt_price_x96, amount_in, zero_for_one)
            .map_err(|e| match e {
                // the input amount, not the pool, overflows the estimate
                MathError::Overflow => QuoteError::AmountOutOfRange,
                MathError::DivisionByZero => QuoteError::InvalidPoolState,
            })?;
        let display_amount_out = apply_bps_discount(amount_out, self.policy.display_haircut_bps)
            .map_err(|_| QuoteError::HaircutOutOfRange(self.policy.display_haircut_bps))?;

        debug!(
            %pool_id,
            %amount_in,
            zero_for_one,
            %amount_out,
            %display_amount_out,
            "quote computed"
        );

        Ok(Quote {
            amount_out,
            display_amount_out,
            state,
        })
    }
}

/// Last-write-wins ticketing for in-flight quotes.
///
/// UI callers fire a new quote per (debounced) input change; a response is
/// only accepted if no newer request has been issued since it started.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuoteSequence {
    last_issued: u64,
}

impl QuoteSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new quote request.
    pub fn begin(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// `true` if a response holding this ticket is still the latest.
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.last_issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, Bytes};
    use alloy_provider::transport::mock::Asserter;
    use alloy_provider::ProviderBuilder;
    use std::str::FromStr;

    const POOL_ID: B256 =
        b256!("0x34fc0d2eb125338f44d3001c5a5fd626aad60d98b763082b7fbdec8a6d501f30");

    // packed word: sqrtPrice 4436291582240826969633872, tick -195836,
    // lpFee 0x800000
    const STATE_WORD: B256 =
        b256!("0x000000800000000000fd030400000000000000000003ab6bd93b5fdf746d3450");

    // nonzero word whose price field is zero
    const PRICELESS_WORD: B256 =
        b256!("0x000000000000000000fd03040000000000000000000000000000000000000000");

    fn engine_with(asserter: &Asserter) -> QuoteEngine<impl Provider> {
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let policy = QuotePolicy {
            retry_delay_ms: 1,
            ..QuotePolicy::default()
        };
        QuoteEngine::new(
            &crate::config::ChainConfig::base(),
            policy,
            Arc::new(provider),
        )
    }

    fn push_word(asserter: &Asserter, word: B256) {
        asserter.push_success(&Bytes::copy_from_slice(word.as_slice()));
    }

    // ---------------- Happy path ----------------

    #[tokio::test]
    async fn buy_quote_matches_golden_values() {
        let asserter = Asserter::new();
        push_word(&asserter, STATE_WORD);
        let engine = engine_with(&asserter);

        let amount_in = U256::from_str("1000000000000000").unwrap(); // 0.001 ether
        let quote = engine.quote(POOL_ID, amount_in, false).await.unwrap();

        assert_eq!(
            quote.amount_out,
            U256::from_str("318947352311808449788755").unwrap()
        );
        // raw estimate * 98 / 100
        assert_eq!(
            quote.display_amount_out,
            U256::from_str("312568405265572280792979").unwrap()
        );
        assert_eq!(
            quote.display_amount_ether(),
            "312568.405265572280792979"
        );
        assert_eq!(quote.state.tick, -195836);
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_quotes() {
        let asserter = Asserter::new();
        push_word(&asserter, STATE_WORD);
        push_word(&asserter, STATE_WORD);
        let engine = engine_with(&asserter);

        let amount_in = U256::from(1_000_000u64);
        let first = engine.quote(POOL_ID, amount_in, true).await.unwrap();
        let second = engine.quote(POOL_ID, amount_in, true).await.unwrap();
        assert_eq!(first, second);
    }

    // ---------------- Error taxonomy ----------------

    #[tokio::test]
    async fn zero_word_reports_pool_uninitialized() {
        let asserter = Asserter::new();
        push_word(&asserter, B256::ZERO);
        let engine = engine_with(&asserter);

        let err = engine
            .quote(POOL_ID, U256::from(1u64), false)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::PoolUninitialized));
    }

    #[tokio::test]
    async fn zero_price_word_reports_invalid_pool_state() {
        let asserter = Asserter::new();
        push_word(&asserter, PRICELESS_WORD);
        let engine = engine_with(&asserter);

        let err = engine
            .quote(POOL_ID, U256::from(1u64), false)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidPoolState));
    }

    #[tokio::test]
    async fn oversized_amount_is_not_blamed_on_the_pool() {
        let asserter = Asserter::new();
        push_word(&asserter, STATE_WORD);
        let engine = engine_with(&asserter);

        let err = engine.quote(POOL_ID, U256::MAX, false).await.unwrap_err();
        assert!(matches!(err, QuoteError::AmountOutOfRange));
    }

    #[tokio::test]
    async fn over_unity_haircut_is_a_policy_error() {
        let asserter = Asserter::new();
        push_word(&asserter, STATE_WORD);
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let policy = QuotePolicy {
            display_haircut_bps: 10_001,
            ..QuotePolicy::default()
        };
        let engine = QuoteEngine::new(
            &crate::config::ChainConfig::base(),
            policy,
            Arc::new(provider),
        );

        let err = engine
            .quote(POOL_ID, U256::from(1u64), true)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::HaircutOutOfRange(10_001)));
    }

    #[tokio::test]
    async fn read_failures_are_retried_then_surfaced() {
        let asserter = Asserter::new();
        // initial attempt + read_retries extra attempts, all failing
        for _ in 0..3 {
            asserter.push_failure_msg("node unavailable");
        }
        let engine = engine_with(&asserter);

        let err = engine
            .quote(POOL_ID, U256::from(1u64), false)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::ReadFailed(_)));
    }

    #[tokio::test]
    async fn read_recovers_within_retry_budget() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("transient");
        push_word(&asserter, STATE_WORD);
        let engine = engine_with(&asserter);

        let quote = engine.quote(POOL_ID, U256::from(1u64), true).await;
        assert!(quote.is_ok());
    }

    // ---------------- Staleness ----------------

    #[test]
    fn quote_sequence_drops_stale_tickets() {
        let mut seq = QuoteSequence::new();

        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
