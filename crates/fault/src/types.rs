//! The types module holds the values passed between the [crate::FaultSolver], the
//! [crate::Responder] and the [crate::TxManager].

use alloy_primitives::{Address, B256};
use narya_primitives::{Claim, PositionError};

/// The [FaultSolverResponse] enum describes the response that a solver returns when asked to
/// solve a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultSolverResponse {
    /// Counter the claim with the given move. The move's [Claim::defends_parent] decides whether
    /// it is submitted as an attack or a defense.
    Move(Claim),
    /// Leave the claim alone.
    Skip,
    /// Resolve the leaf claim with a single VM step.
    Step(StepData),
}

/// The [StepData] struct describes a step against a leaf claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepData {
    /// The leaf claim being stepped against.
    pub leaf_claim: Claim,
    /// The claim that brackets the leaf: its post-state when attacking, otherwise its pre-state.
    /// May be the absolute prestate sentinel.
    pub state_claim: Claim,
    /// Whether the step is an attack.
    pub is_attack: bool,
}

impl StepData {
    /// Returns the trace index whose preimage seeds the step, or [None] when the step starts from
    /// the absolute prestate. Fails if the leaf does not sit within a tree of depth `max_depth`.
    ///
    /// When attacking, the leaf is agreed upon and is itself the pre-state. Otherwise the
    /// pre-state is the trace index just before the leaf.
    pub fn pre_state_trace_index(&self, max_depth: u8) -> Result<Option<u64>, PositionError> {
        let leaf_index = self.leaf_claim.trace_index(max_depth)?;
        if self.is_attack {
            Ok(Some(leaf_index))
        } else {
            Ok(leaf_index.checked_sub(1))
        }
    }
}

/// The [StepCallData] struct holds the arguments of the contract's `step` function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCallData {
    pub state_index: u64,
    pub claim_index: u64,
    pub is_attack: bool,
    pub state_data: Vec<u8>,
    pub proof: Vec<u8>,
}

/// A [TxCandidate] is a transaction handed to the [crate::TxManager]. A `gas_limit` of zero asks
/// the manager to estimate gas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxCandidate {
    pub to: Address,
    pub data: Vec<u8>,
    pub gas_limit: u64,
}

/// The execution status reported by a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// The [Receipt] of a transaction that made it into a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub status: ReceiptStatus,
    pub tx_hash: B256,
}
