//! This module contains the [Agent], which plays one round of a fault dispute game: it solves
//! every claim in the [GameState] and hands the resulting moves and steps to a [Responder].

use crate::{
    FaultConfig, FaultError, FaultSolver, FaultSolverResponse, GameState, Responder,
    StepCallData, StepData, TraceProvider,
};
use futures::future::join_all;
use narya_primitives::Claim;

/// The outcome of a single [Agent::act] round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActReport {
    /// Moves dispatched successfully.
    pub moves: usize,
    /// Steps dispatched successfully.
    pub steps: usize,
    /// Claims that needed no response, including moves already present in the game.
    pub skips: usize,
    /// Claims that could not be solved and responses that failed to dispatch.
    pub failures: usize,
}

/// An action decided by the solver, ready to be dispatched.
#[derive(Debug)]
enum Action {
    Move(Claim),
    Step(StepCallData),
}

/// The [Agent] drives a [FaultSolver] over a game and dispatches its decisions through a
/// [Responder].
#[derive(Debug)]
pub struct Agent<P: TraceProvider, R: Responder> {
    solver: FaultSolver<P>,
    responder: R,
}

impl<P, R> Agent<P, R>
where
    P: TraceProvider + Sync,
    R: Responder + Sync,
{
    pub fn new(solver: FaultSolver<P>, responder: R) -> Self {
        Self { solver, responder }
    }

    /// Creates an [Agent] for the game described by a validated [FaultConfig].
    pub fn try_new(config: &FaultConfig, provider: P, responder: R) -> Result<Self, FaultError> {
        config.validate()?;
        Ok(Self::new(
            FaultSolver::new(config.max_depth, provider),
            responder,
        ))
    }

    /// Returns a shared reference to the [FaultSolver].
    pub fn solver(&self) -> &FaultSolver<P> {
        &self.solver
    }

    /// Returns a shared reference to the [Responder].
    pub fn responder(&self) -> &R {
        &self.responder
    }

    /// Solves every claim in the game and dispatches the responses concurrently. A failure on one
    /// claim is logged and counted without aborting the round.
    pub async fn act(&self, game: &GameState) -> ActReport {
        let mut report = ActReport::default();
        let mut actions = Vec::new();

        for claim in game.claims() {
            let action = self
                .solver
                .solve_claim(&claim, game)
                .and_then(|response| self.plan(response, game));
            match action {
                Ok(Some(action)) => actions.push(action),
                Ok(None) => report.skips += 1,
                Err(e) => {
                    tracing::warn!(
                        target: "fault-agent",
                        "Failed to solve claim at position {:?}: {}",
                        claim.position(),
                        e
                    );
                    report.failures += 1;
                }
            }
        }

        let results = join_all(actions.iter().map(|action| self.dispatch(action))).await;
        for (action, result) in actions.iter().zip(results) {
            match (action, result) {
                (Action::Move(_), Ok(())) => report.moves += 1,
                (Action::Step(_), Ok(())) => report.steps += 1,
                (action, Err(e)) => {
                    tracing::error!(
                        target: "fault-agent",
                        "Failed to dispatch {:?}: {}",
                        action,
                        e
                    );
                    report.failures += 1;
                }
            }
        }

        tracing::info!(
            target: "fault-agent",
            "Acted on {} claims: {} moves, {} steps, {} skips, {} failures",
            game.len(),
            report.moves,
            report.steps,
            report.skips,
            report.failures
        );
        report
    }

    /// Turns a solver response into an [Action]. Moves already present in the game are skipped.
    fn plan(
        &self,
        response: FaultSolverResponse,
        game: &GameState,
    ) -> Result<Option<Action>, FaultError> {
        match response {
            FaultSolverResponse::Move(claim) if game.is_duplicate(&claim) => {
                tracing::debug!(
                    target: "fault-agent",
                    "Skipping duplicate move at position {:?}",
                    claim.position()
                );
                Ok(None)
            }
            FaultSolverResponse::Move(claim) => Ok(Some(Action::Move(claim))),
            FaultSolverResponse::Skip => Ok(None),
            FaultSolverResponse::Step(step) => {
                self.step_call_data(&step).map(|s| Some(Action::Step(s)))
            }
        }
    }

    /// Builds the arguments of the contract's `step` function for a [StepData].
    fn step_call_data(&self, step: &StepData) -> Result<StepCallData, FaultError> {
        let provider = self.solver.provider();
        let state_index = if step.state_claim.is_absolute_prestate() {
            0
        } else {
            u64::try_from(step.state_claim.contract_index)
                .map_err(|_| FaultError::NegativeIndex)?
        };
        let claim_index =
            u64::try_from(step.leaf_claim.contract_index).map_err(|_| FaultError::NegativeIndex)?;

        let (state_data, proof) = match step.pre_state_trace_index(self.solver.max_depth())? {
            Some(i) => (provider.preimage(i)?, provider.proof(i)?),
            None => (provider.absolute_prestate()?, Vec::new()),
        };

        Ok(StepCallData {
            state_index,
            claim_index,
            is_attack: step.is_attack,
            state_data,
            proof,
        })
    }

    async fn dispatch(&self, action: &Action) -> Result<(), FaultError> {
        match action {
            Action::Move(claim) => self.responder.respond(claim).await,
            Action::Step(step) => self.responder.step(step).await,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mocks::MockResponder,
        providers::AlphabetTraceProvider,
        state::test::{test_claims, TEST_MAX_DEPTH},
    };
    use alloy_primitives::{address, hex, B256};
    use narya_primitives::{ClaimData, Position};

    fn agent(responder: MockResponder) -> Agent<AlphabetTraceProvider, MockResponder> {
        let config = FaultConfig::new(
            address!("00000000000000000000000000000000000fa017"),
            TEST_MAX_DEPTH,
        );
        Agent::try_new(
            &config,
            AlphabetTraceProvider::new("abcdefgh", TEST_MAX_DEPTH),
            responder,
        )
        .unwrap()
    }

    #[test]
    fn try_new_validates_config() {
        let config = FaultConfig::new(address!("00000000000000000000000000000000000fa017"), 0);
        assert!(matches!(
            Agent::try_new(
                &config,
                AlphabetTraceProvider::new("abcdefgh", 3),
                MockResponder::default()
            ),
            Err(FaultError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn act_attacks_dishonest_root() {
        let responder = MockResponder::default();
        let agent = agent(responder.clone());
        let (root, top, _, _) = test_claims();
        let game = GameState::new(root, TEST_MAX_DEPTH);

        let report = agent.act(&game).await;
        assert_eq!(
            report,
            ActReport {
                moves: 1,
                ..Default::default()
            }
        );

        let responses = responder.responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].data, top.data);
        assert_eq!(responses[0].parent_contract_index, root.contract_index);
    }

    #[tokio::test]
    async fn act_skips_duplicates_and_steps_on_leaf() {
        let responder = MockResponder::default();
        let agent = agent(responder.clone());
        let (root, top, middle, bottom) = test_claims();
        let mut game = GameState::new(root, TEST_MAX_DEPTH);
        game.put_all(&[top, middle, bottom]).unwrap();

        let report = agent.act(&game).await;
        assert_eq!(
            report,
            ActReport {
                moves: 0,
                steps: 1,
                skips: 3,
                failures: 0,
            }
        );
        assert!(responder.responses().is_empty());
        assert_eq!(
            responder.steps(),
            vec![StepCallData {
                state_index: middle.contract_index as u64,
                claim_index: bottom.contract_index as u64,
                is_attack: true,
                state_data: vec![0x04, b'e'],
                proof: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn act_steps_from_absolute_prestate() {
        let responder = MockResponder::default();
        let agent = agent(responder.clone());
        let (root, top, _, _) = test_claims();
        let left = Claim {
            data: ClaimData::new(B256::ZERO, Position::new(2, 0)),
            parent: top.data,
            contract_index: 2,
            parent_contract_index: 1,
        };
        let leftmost = Claim {
            data: ClaimData::new(B256::with_last_byte(0x01), Position::new(3, 0)),
            parent: left.data,
            contract_index: 3,
            parent_contract_index: 2,
        };
        let mut game = GameState::new(root, TEST_MAX_DEPTH);
        game.put_all(&[top, left, leftmost]).unwrap();

        agent.act(&game).await;
        assert_eq!(
            responder.steps(),
            vec![StepCallData {
                state_index: 0,
                claim_index: 3,
                is_attack: false,
                state_data: hex!(
                    "0000000000000000000000000000000000000000000000000000000000000060"
                )
                .to_vec(),
                proof: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn act_counts_dispatch_failures() {
        let (root, top, _, _) = test_claims();
        let attack = Claim {
            contract_index: -1,
            ..top
        };
        let responder = MockResponder::failing_on(vec![attack]);
        let agent = agent(responder.clone());
        let game = GameState::new(root, TEST_MAX_DEPTH);

        let report = agent.act(&game).await;
        assert_eq!(
            report,
            ActReport {
                failures: 1,
                ..Default::default()
            }
        );
        assert!(responder.responses().is_empty());
    }

    #[tokio::test]
    async fn act_counts_solver_failures() {
        // A trace too short for the tree cannot answer the root.
        let config = FaultConfig::new(address!("00000000000000000000000000000000000fa017"), 3);
        let agent = Agent::try_new(
            &config,
            AlphabetTraceProvider::new("abcdefgh", 2),
            MockResponder::default(),
        )
        .unwrap();
        let (root, _, _, _) = test_claims();

        let report = agent.act(&GameState::new(root, 3)).await;
        assert_eq!(report.failures, 1);
    }
}
