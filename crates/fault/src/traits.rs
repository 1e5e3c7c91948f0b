//! This module holds the traits at the seams of the fault game engine: the source of the local
//! execution trace, the responder that acts on the solver's decisions, and the transaction
//! manager that lands them on-chain.

use crate::{FaultError, Receipt, StepCallData, TxCandidate};
use narya_primitives::{Claim, ClaimHash};

/// A [TraceProvider] serves the locally trusted execution trace. It is queried by trace index:
/// the index of the single VM step a commitment refers to.
///
/// Lookups are synchronous so that solving never suspends.
pub trait TraceProvider {
    /// Returns the commitment to the state at trace index `i`.
    fn get(&self, i: u64) -> Result<ClaimHash, FaultError>;

    /// Returns the raw state at trace index `i`, as consumed by the on-chain single step.
    fn preimage(&self, i: u64) -> Result<Vec<u8>, FaultError>;

    /// Returns the raw state that precedes trace index `0`.
    fn absolute_prestate(&self) -> Result<Vec<u8>, FaultError>;

    /// Returns the proof that accompanies the preimage at trace index `i`.
    fn proof(&self, _i: u64) -> Result<Vec<u8>, FaultError> {
        Ok(Vec::new())
    }
}

/// A [Responder] executes the moves and steps decided by the [crate::FaultSolver].
#[async_trait::async_trait]
pub trait Responder {
    /// Counters the parent of `response` with `response`, as an attack or a defense.
    async fn respond(&self, response: &Claim) -> Result<(), FaultError>;

    /// Performs a single VM step against a leaf claim.
    async fn step(&self, step_data: &StepCallData) -> Result<(), FaultError>;
}

/// A [TxManager] signs, publishes and tracks transactions, blocking until the transaction is
/// included or fails. Gas and nonce management belong to the implementation.
#[async_trait::async_trait]
pub trait TxManager {
    /// Sends the candidate and waits for its [Receipt].
    async fn send(&self, candidate: TxCandidate) -> anyhow::Result<Receipt>;
}
