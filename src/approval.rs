//! Permit2 approval sequencing for token sells.
//!
//! Selling through the Universal Router pulls the input token via Permit2,
//! which needs two distinct allowances in place before the swap can land:
//!
//! 1. an ERC20 allowance from the owner to the Permit2 contract, and
//! 2. a Permit2 allowance from the owner to the router.
//!
//! [`SwapSequencer`] reads both allowances, decides which (if any) approval
//! transaction must come next, and walks a strict state machine so the swap
//! can never be submitted ahead of its prerequisites. Native-currency buys
//! wrap inside the router and skip this module entirely.

use crate::abi::{IAllowanceTransfer, IERC20};
use crate::config::ChainConfig;
use crate::error::{ApprovalError, Error, SwapError};
use crate::quote::OnchainProvider;
use crate::router::{RouterPlan, TransactionSpec};
use alloy_primitives::aliases::{U160, U48};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::SolCall;
use tracing::debug;

/// Which leg of the sequence a failure happened on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailedStep {
    TokenApproval,
    RouterApproval,
    Swap,
}

/// Where a sell currently stands in the approve-approve-swap sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapStage {
    Idle,
    /// The ERC20 allowance to Permit2 is insufficient.
    AwaitingTokenApproval,
    /// The Permit2 allowance to the router is insufficient or expired.
    AwaitingRouterApproval,
    ReadyToSwap,
    Submitted,
    Confirmed,
    /// Terminal; records which leg failed so the caller can report it.
    Failed { step: FailedStep, reason: String },
}

impl SwapStage {
    fn name(&self) -> &'static str {
        match self {
            SwapStage::Idle => "Idle",
            SwapStage::AwaitingTokenApproval => "AwaitingTokenApproval",
            SwapStage::AwaitingRouterApproval => "AwaitingRouterApproval",
            SwapStage::ReadyToSwap => "ReadyToSwap",
            SwapStage::Submitted => "Submitted",
            SwapStage::Confirmed => "Confirmed",
            SwapStage::Failed { .. } => "Failed",
        }
    }
}

/// Drives one sell from allowance checks through swap confirmation.
#[derive(Clone, Debug)]
pub struct SwapSequencer<P> {
    token: IERC20::IERC20Instance<OnchainProvider<P>>,
    permit2: IAllowanceTransfer::IAllowanceTransferInstance<OnchainProvider<P>>,
    owner: Address,
    router: Address,
    amount_in: U256,
    plan: RouterPlan,
    stage: SwapStage,
}

impl<P> SwapSequencer<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(
        config: &ChainConfig,
        token: Address,
        owner: Address,
        amount_in: U256,
        plan: RouterPlan,
        provider: OnchainProvider<P>,
    ) -> Self {
        Self {
            token: IERC20::IERC20Instance::new(token, provider.clone()),
            permit2: IAllowanceTransfer::IAllowanceTransferInstance::new(config.permit2, provider),
            owner,
            router: config.universal_router,
            amount_in,
            plan,
            stage: SwapStage::Idle,
        }
    }

    pub fn stage(&self) -> &SwapStage {
        &self.stage
    }

    /// Reads both allowances and moves to the first stage with unmet
    /// prerequisites. `now` is the wall-clock unix timestamp used to judge
    /// Permit2 expiry.
    ///
    /// Valid from `Idle` and from either awaiting stage; re-run it after an
    /// approval confirms rather than assuming the chain state advanced.
    pub async fn assess(&mut self, now: u64) -> Result<&SwapStage, ApprovalError> {
        match self.stage {
            SwapStage::Idle
            | SwapStage::AwaitingTokenApproval
            | SwapStage::AwaitingRouterApproval => {}
            _ => {
                return Err(ApprovalError::InvalidTransition {
                    stage: self.stage.name(),
                    event: "assess",
                })
            }
        }

        let erc20_allowance = self
            .token
            .allowance(self.owner, *self.permit2.address())
            .call()
            .await
            .map_err(|e| ApprovalError::AllowanceReadFailed(e.to_string()))?;

        if erc20_allowance < self.amount_in {
            debug!(owner = %self.owner, "token allowance to permit2 insufficient");
            self.stage = SwapStage::AwaitingTokenApproval;
            return Ok(&self.stage);
        }

        let permitted = self
            .permit2
            .allowance(self.owner, *self.token.address(), self.router)
            .call()
            .await
            .map_err(|e| ApprovalError::AllowanceReadFailed(e.to_string()))?;

        let expired = permitted.expiration.to::<u64>() <= now;
        if U256::from(permitted.amount) < self.amount_in || expired {
            debug!(owner = %self.owner, expired, "permit2 allowance to router insufficient");
            self.stage = SwapStage::AwaitingRouterApproval;
        } else {
            self.stage = SwapStage::ReadyToSwap;
        }
        Ok(&self.stage)
    }

    /// The transaction the caller must send to advance from the current
    /// stage, or `None` when no transaction is pending.
    ///
    /// Approvals are unbounded (max amount, max expiration) so repeat sells
    /// skip straight to the swap.
    pub fn next_transaction(&self) -> Option<TransactionSpec> {
        match self.stage {
            SwapStage::AwaitingTokenApproval => Some(TransactionSpec {
                to: *self.token.address(),
                input: IERC20::approveCall {
                    spender: *self.permit2.address(),
                    amount: U256::MAX,
                }
                .abi_encode()
                .into(),
                value: U256::ZERO,
            }),
            SwapStage::AwaitingRouterApproval => Some(TransactionSpec {
                to: *self.permit2.address(),
                input: IAllowanceTransfer::approveCall {
                    token: *self.token.address(),
                    spender: self.router,
                    amount: U160::MAX,
                    expiration: U48::MAX,
                }
                .abi_encode()
                .into(),
                value: U256::ZERO,
            }),
            SwapStage::ReadyToSwap => Some(self.plan.transaction()),
            _ => None,
        }
    }

    /// The swap itself; only legal once both approvals are in place.
    pub fn swap_transaction(&self) -> Result<TransactionSpec, SwapError> {
        match self.stage {
            SwapStage::ReadyToSwap => Ok(self.plan.transaction()),
            _ => Err(SwapError::ApprovalsNotReady),
        }
    }

    /// Marks the swap transaction as broadcast.
    pub fn mark_submitted(&mut self) -> Result<(), ApprovalError> {
        match self.stage {
            SwapStage::ReadyToSwap => {
                self.stage = SwapStage::Submitted;
                Ok(())
            }
            _ => Err(ApprovalError::InvalidTransition {
                stage: self.stage.name(),
                event: "mark_submitted",
            }),
        }
    }

    /// Advances the machine after the pending transaction confirmed.
    ///
    /// Approval confirmations fall back to the awaiting stage's successor;
    /// call [`assess`](Self::assess) afterwards if the on-chain allowances
    /// may have changed underneath.
    pub fn on_confirmed(&mut self) -> Result<&SwapStage, ApprovalError> {
        self.stage = match self.stage {
            SwapStage::AwaitingTokenApproval => SwapStage::AwaitingRouterApproval,
            SwapStage::AwaitingRouterApproval => SwapStage::ReadyToSwap,
            SwapStage::Submitted => SwapStage::Confirmed,
            _ => {
                return Err(ApprovalError::InvalidTransition {
                    stage: self.stage.name(),
                    event: "on_confirmed",
                })
            }
        };
        Ok(&self.stage)
    }

    /// Records a rejected or reverted transaction; terminal. The failing
    /// leg is taken from the stage the failure arrived in.
    pub fn on_failed(&mut self, reason: &str) -> Result<(), ApprovalError> {
        let step = match self.stage {
            SwapStage::AwaitingTokenApproval => FailedStep::TokenApproval,
            SwapStage::AwaitingRouterApproval => FailedStep::RouterApproval,
            SwapStage::Submitted => FailedStep::Swap,
            _ => {
                return Err(ApprovalError::InvalidTransition {
                    stage: self.stage.name(),
                    event: "on_failed",
                })
            }
        };
        self.stage = SwapStage::Failed {
            step,
            reason: reason.to_string(),
        };
        Ok(())
    }

    /// Terminal verdict for the whole sequence.
    ///
    /// An approval-leg failure surfaces as the matching [`ApprovalError`]
    /// variant; [`SwapError::Reverted`] is reserved for a swap that was
    /// actually submitted.
    pub fn outcome(&self) -> Result<(), Error> {
        match &self.stage {
            SwapStage::Confirmed => Ok(()),
            SwapStage::Failed { step, reason } => Err(match step {
                FailedStep::TokenApproval => {
                    ApprovalError::TokenApprovalFailed(reason.clone()).into()
                }
                FailedStep::RouterApproval => {
                    ApprovalError::RouterApprovalFailed(reason.clone()).into()
                }
                FailedStep::Swap => SwapError::Reverted(reason.clone()).into(),
            }),
            _ => Err(SwapError::ApprovalsNotReady.into()),
        }
    }
}

/// Encoded unbounded ERC20 approval targeting Permit2, exposed for callers
/// that build approvals outside a sequencer.
pub fn encode_token_approval(token: Address, permit2: Address) -> TransactionSpec {
    TransactionSpec {
        to: token,
        input: IERC20::approveCall {
            spender: permit2,
            amount: U256::MAX,
        }
        .abi_encode()
        .into(),
        value: U256::ZERO,
    }
}

/// Encoded unbounded Permit2 approval targeting the router.
pub fn encode_router_approval(permit2: Address, token: Address, router: Address) -> TransactionSpec {
    TransactionSpec {
        to: permit2,
        input: IAllowanceTransfer::approveCall {
            token,
            spender: router,
            amount: U160::MAX,
            expiration: U48::MAX,
        }
        .abi_encode()
        .into(),
        value: U256::ZERO,
    }
}
