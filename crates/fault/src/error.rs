//! The error type shared by the claim tree, the solver and the responder.

use narya_primitives::PositionError;
use std::time::Duration;
use thiserror::Error;

/// A [FaultError] is returned by every fallible operation of the fault game engine.
#[derive(Error, Debug)]
pub enum FaultError {
    /// The claim is the root claim or has already been inserted into the game state.
    #[error("claim exists in game state")]
    ClaimExists,
    /// The claim, or the parent being walked to, does not exist in the game state.
    #[error("claim not found in game state")]
    ClaimNotFound,
    /// The claim's parent has not been inserted into the game state.
    #[error("no parent claim")]
    NoParentClaim,
    /// Pre and post state were requested for a claim above the maximum depth.
    #[error("only leaf claims have pre or post state")]
    NotLeafClaim,
    /// A step was attempted against a claim above the maximum depth.
    #[error("cannot step on non-leaf claims")]
    StepOnNonLeaf,
    /// A move was requested against a claim that already sits at the maximum depth.
    #[error("game depth reached")]
    GameDepthReached,
    /// A contract index below zero was handed to the contract.
    #[error("index cannot be negative")]
    NegativeIndex,
    /// A trace index beyond the end of the trace was requested.
    #[error("index is larger than the maximum index")]
    IndexTooLarge,
    /// Position arithmetic left the tree.
    #[error(transparent)]
    Position(#[from] PositionError),
    /// The trace provider failed to produce a commitment or preimage.
    #[error("trace provider error: {0}")]
    Provider(anyhow::Error),
    /// The transaction manager failed to land a transaction.
    #[error("transaction failed: {0}")]
    Transaction(anyhow::Error),
    /// The transaction was not included before the configured timeout.
    #[error("transaction was not included within {0:?}")]
    SendTimeout(Duration),
    /// The configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FaultError {
    /// Returns `true` for network and transaction failures that the caller may retry with
    /// backoff. Every other error reflects a caller invariant violation or malformed input.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transaction(_) | Self::SendTimeout(_))
    }
}
