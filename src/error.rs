use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error - no addresses configured for chain id {0}")]
    UnsupportedChain(u64),
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote error - pool not initialized")]
    PoolUninitialized,
    #[error("Quote error - invalid pool state (zero sqrt price)")]
    InvalidPoolState,
    #[error("Quote error - storage read failed: {0}")]
    ReadFailed(String),
    #[error("Quote error - input amount too large to quote")]
    AmountOutOfRange,
    #[error("Quote error - display haircut {0} bps exceeds 100%")]
    HaircutOutOfRange(u32),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Encode error - identical currencies in pool key")]
    IdenticalCurrencies,
    #[error("Encode error - tick spacing {0} outside [1, 16383]")]
    TickSpacingOutOfBounds(i32),
    #[error("Encode error - fee {0} exceeds maximum and is not the dynamic-fee flag")]
    FeeOutOfBounds(u32),
    #[error("Encode error - amount does not fit in {width}-bit field")]
    AmountOverflow { width: u32 },
    #[error("Encode error - zero input amount")]
    ZeroAmount,
    #[error("Encode error - input currency is not part of the pool")]
    CurrencyNotInPool,
}

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("Approval error - allowance read failed: {0}")]
    AllowanceReadFailed(String),
    #[error("Approval error - token approval rejected or reverted: {0}")]
    TokenApprovalFailed(String),
    #[error("Approval error - router approval via Permit2 rejected or reverted: {0}")]
    RouterApprovalFailed(String),
    #[error("Approval error - event {event} not valid in stage {stage}")]
    InvalidTransition {
        stage: &'static str,
        event: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Swap error - transaction reverted on-chain: {0}")]
    Reverted(String),
    #[error("Swap error - attempted before approvals confirmed")]
    ApprovalsNotReady,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    QuoteError(#[from] QuoteError),

    #[error(transparent)]
    EncodeError(#[from] EncodeError),

    #[error(transparent)]
    ApprovalError(#[from] ApprovalError),

    #[error(transparent)]
    SwapError(#[from] SwapError),
}
