//! This module contains the [FaultSolver], which computes the honest response to any claim in a
//! [GameState] from the locally trusted trace.

use crate::{FaultError, FaultSolverResponse, GameState, StepData, TraceProvider};
use narya_primitives::{
    Claim, ClaimData, ClaimHash, Position, ABSOLUTE_PRESTATE_INDEX, MAX_GAME_DEPTH,
};

/// A [FaultSolver] decides the next move against a claim using a [TraceProvider] as its source of
/// truth. It holds no game state of its own; solving is a pure function of the claim, the game
/// and the trace.
#[derive(Debug, Clone)]
pub struct FaultSolver<P: TraceProvider> {
    provider: P,
    max_depth: u8,
}

impl<P: TraceProvider> FaultSolver<P> {
    /// Creates a new [FaultSolver]. Depths past [MAX_GAME_DEPTH] are clamped to it.
    pub fn new(max_depth: u8, provider: P) -> Self {
        Self {
            provider,
            max_depth: max_depth.min(MAX_GAME_DEPTH),
        }
    }

    /// Returns a shared reference to the [TraceProvider] that the solver uses.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the max depth of the position tree the solver plays on.
    pub const fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Finds the response to any claim in the game: a step for leaf claims, otherwise a move or
    /// nothing at all.
    pub fn solve_claim(
        &self,
        claim: &Claim,
        game: &GameState,
    ) -> Result<FaultSolverResponse, FaultError> {
        if claim.depth() == self.max_depth {
            return self.attempt_step(claim, game).map(FaultSolverResponse::Step);
        }
        Ok(self
            .next_move(claim)?
            .map_or(FaultSolverResponse::Skip, FaultSolverResponse::Move))
    }

    /// Returns the counter-claim to make against `claim`, or [None] if the claim should be left
    /// alone.
    ///
    /// ### Takes
    /// - `claim`: The claim to respond to. Must sit above the max depth.
    ///
    /// ### Returns
    /// - `Ok(Some(Claim))`: The move, with `claim` as its parent.
    /// - `Ok(None)`: We agree with the root, or the claim correctly counters a parent we
    ///   disagree with.
    /// - `Err(FaultError)`: The claim is a leaf, or the trace could not be read.
    pub fn next_move(&self, claim: &Claim) -> Result<Option<Claim>, FaultError> {
        if claim.is_root() {
            return self.handle_root(claim);
        }
        self.handle_middle(claim)
    }

    /// Determines the step to perform against a leaf claim.
    ///
    /// If we agree with the leaf, the divergence lies between the leaf and its post-state, and
    /// the step attacks. Otherwise the divergence lies between the pre-state and the leaf.
    pub fn attempt_step(&self, claim: &Claim, game: &GameState) -> Result<StepData, FaultError> {
        if claim.depth() != self.max_depth {
            return Err(FaultError::StepOnNonLeaf);
        }

        let claim_correct = self.agree_with_claim(&claim.data)?;
        let state_claim = if claim_correct {
            game.post_state_claim(claim)?
        } else {
            game.pre_state_claim(claim)?
        };

        let leaf_index = claim.trace_index(self.max_depth)?;
        tracing::debug!(
            target: "fault-solver",
            "Step against leaf at trace index {} uses state claim at depth {} (attack: {})",
            leaf_index,
            state_claim.depth(),
            claim_correct
        );

        Ok(StepData {
            leaf_claim: *claim,
            state_claim,
            is_attack: claim_correct,
        })
    }

    fn handle_root(&self, claim: &Claim) -> Result<Option<Claim>, FaultError> {
        // The root can only be attacked.
        if self.agree_with_claim(&claim.data)? {
            return Ok(None);
        }
        self.attack(claim).map(Some)
    }

    fn handle_middle(&self, claim: &Claim) -> Result<Option<Claim>, FaultError> {
        if claim.depth() >= self.max_depth {
            return Err(FaultError::GameDepthReached);
        }

        let claim_correct = self.agree_with_claim(&claim.data)?;
        let parent_correct = self.agree_with_claim(&claim.parent)?;

        match (parent_correct, claim_correct) {
            // The claim disputes a parent we agree with, yet we agree with it too: the
            // difference lies to the right of the claim.
            (true, true) => self.defend(claim).map(Some),
            // The difference lies to the left of the claim. When we disagree with the parent as
            // well, its own counter is produced when the parent is solved.
            (true, false) | (false, false) => self.attack(claim).map(Some),
            // The claim already counters a parent we disagree with.
            (false, true) => Ok(None),
        }
    }

    fn attack(&self, claim: &Claim) -> Result<Claim, FaultError> {
        self.counter_at(claim, claim.position().attack())
    }

    fn defend(&self, claim: &Claim) -> Result<Claim, FaultError> {
        self.counter_at(claim, claim.position().defend()?)
    }

    fn counter_at(&self, claim: &Claim, position: Position) -> Result<Claim, FaultError> {
        let value = self.trace_at_position(position)?;
        Ok(Claim {
            data: ClaimData::new(value, position),
            parent: claim.data,
            contract_index: ABSOLUTE_PRESTATE_INDEX,
            parent_contract_index: claim.contract_index,
        })
    }

    /// Returns `true` if the claim matches the local trace.
    #[inline]
    fn agree_with_claim(&self, claim: &ClaimData) -> Result<bool, FaultError> {
        Ok(self.trace_at_position(claim.position)? == claim.value)
    }

    /// Fetches the commitment at the trace index of a given position from the [TraceProvider].
    /// Positions outside of the game tree are rejected before the provider is queried.
    #[inline]
    fn trace_at_position(&self, position: Position) -> Result<ClaimHash, FaultError> {
        self.provider.get(position.trace_index(self.max_depth)?)
    }
}
