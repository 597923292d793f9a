pub mod commands;
pub mod encoder;

pub use commands::{Command, V4Action, V4ActionBatch, ADDRESS_THIS};
pub use encoder::{RouterPlan, SwapEncoder, SwapIntent};

use alloy_primitives::{Address, Bytes, U256};

/// A fully-built transaction for the wallet collaborator to sign and send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionSpec {
    pub to: Address,
    pub input: Bytes,
    pub value: U256,
}
