//! This module contains the [FaultResponder], which turns the solver's decisions into calls on the
//! FaultDisputeGame contract and lands them through a [TxManager].

use crate::{
    FaultConfig, FaultError, ReceiptStatus, Responder, StepCallData, TxCandidate, TxManager,
};
use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use narya_primitives::Claim;
use std::time::Duration;

sol! {
    function attack(uint256 parentIndex, bytes32 pivot) external payable;
    function defend(uint256 parentIndex, bytes32 pivot) external payable;
    function step(
        uint256 stateIndex,
        uint256 claimIndex,
        bool isAttack,
        bytes stateData,
        bytes proof
    ) external;
}

/// The [FaultResponder] is the production [Responder]: it ABI-encodes moves and steps against the
/// dispute game at `game_address` and submits them through its [TxManager].
#[derive(Debug, Clone)]
pub struct FaultResponder<T: TxManager> {
    tx_manager: T,
    game_address: Address,
    /// Upper bound on the wait for inclusion. [None] leaves it to the [TxManager].
    send_timeout: Option<Duration>,
}

impl<T: TxManager + Sync> FaultResponder<T> {
    pub fn new(tx_manager: T, game_address: Address) -> Self {
        Self {
            tx_manager,
            game_address,
            send_timeout: None,
        }
    }

    /// Creates a [FaultResponder] for the game and timeout named in the [FaultConfig].
    pub fn from_config(tx_manager: T, config: &FaultConfig) -> Self {
        Self {
            tx_manager,
            game_address: config.game_address,
            send_timeout: config.send_timeout,
        }
    }

    /// Bounds the wait for inclusion of every transaction sent by this responder.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Builds the calldata countering the parent of `response`: `defend` if the response defends
    /// its parent, `attack` otherwise.
    pub fn build_tx(&self, response: &Claim) -> Result<Vec<u8>, FaultError> {
        let parent_index = contract_index(response.parent_contract_index)?;
        let pivot = response.value_bytes().into();

        if response.defends_parent() {
            Ok(defendCall {
                parentIndex: parent_index,
                pivot,
            }
            .abi_encode())
        } else {
            Ok(attackCall {
                parentIndex: parent_index,
                pivot,
            }
            .abi_encode())
        }
    }

    /// Builds the calldata for the `step` function.
    pub fn build_step_tx(&self, step_data: &StepCallData) -> Vec<u8> {
        stepCall {
            stateIndex: U256::from(step_data.state_index),
            claimIndex: U256::from(step_data.claim_index),
            isAttack: step_data.is_attack,
            stateData: step_data.state_data.clone().into(),
            proof: step_data.proof.clone().into(),
        }
        .abi_encode()
    }

    /// Sends the calldata to the game through the [TxManager] and waits for the receipt. Gas is
    /// always estimated by the manager. A reverted receipt is logged, not returned: responses
    /// race with other participants and a revert is expected from time to time.
    async fn send_tx_and_wait(&self, data: Vec<u8>) -> Result<(), FaultError> {
        let candidate = TxCandidate {
            to: self.game_address,
            data,
            gas_limit: 0,
        };

        let send = self.tx_manager.send(candidate);
        let receipt = match self.send_timeout {
            Some(timeout) => tokio::time::timeout(timeout, send)
                .await
                .map_err(|_| FaultError::SendTimeout(timeout))?,
            None => send.await,
        }
        .map_err(FaultError::Transaction)?;

        match receipt.status {
            ReceiptStatus::Reverted => tracing::warn!(
                target: "fault-responder",
                "Responder tx successfully published but reverted: {}",
                receipt.tx_hash
            ),
            ReceiptStatus::Success => tracing::info!(
                target: "fault-responder",
                "Responder tx successfully published: {}",
                receipt.tx_hash
            ),
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T: TxManager + Send + Sync> Responder for FaultResponder<T> {
    async fn respond(&self, response: &Claim) -> Result<(), FaultError> {
        let data = self.build_tx(response)?;
        self.send_tx_and_wait(data).await
    }

    async fn step(&self, step_data: &StepCallData) -> Result<(), FaultError> {
        let data = self.build_step_tx(step_data);
        self.send_tx_and_wait(data).await
    }
}

/// Converts a contract index into its `uint256` argument. Claims that are not anchored on-chain
/// cannot be referenced by the contract.
fn contract_index(index: i64) -> Result<U256, FaultError> {
    u64::try_from(index)
        .map(U256::from)
        .map_err(|_| FaultError::NegativeIndex)
}
