//! Test doubles for the [TxManager] and [Responder] seams.

use crate::{
    FaultError, Receipt, ReceiptStatus, Responder, StepCallData, TxCandidate, TxManager,
};
use alloy_primitives::B256;
use narya_primitives::Claim;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

/// A [TxManager] that records every candidate and answers with queued receipts. Once the queue is
/// drained every send succeeds.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTxManager {
    sent: Arc<Mutex<Vec<TxCandidate>>>,
    receipts: Arc<Mutex<VecDeque<anyhow::Result<Receipt>>>>,
    delay: Option<Duration>,
}

impl MockTxManager {
    pub(crate) fn with_receipts(receipts: Vec<anyhow::Result<Receipt>>) -> Self {
        Self {
            receipts: Arc::new(Mutex::new(receipts.into())),
            ..Default::default()
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn sent(&self) -> Vec<TxCandidate> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TxManager for MockTxManager {
    async fn send(&self, candidate: TxCandidate) -> anyhow::Result<Receipt> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let nonce = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(candidate);
            sent.len() as u8
        };

        self.receipts.lock().unwrap().pop_front().unwrap_or(Ok(Receipt {
            status: ReceiptStatus::Success,
            tx_hash: B256::with_last_byte(nonce),
        }))
    }
}

/// A [Responder] that records what it was asked to do. Moves listed in `failing` are rejected.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockResponder {
    responses: Arc<Mutex<Vec<Claim>>>,
    steps: Arc<Mutex<Vec<StepCallData>>>,
    failing: Vec<Claim>,
}

impl MockResponder {
    pub(crate) fn failing_on(failing: Vec<Claim>) -> Self {
        Self {
            failing,
            ..Default::default()
        }
    }

    pub(crate) fn responses(&self) -> Vec<Claim> {
        self.responses.lock().unwrap().clone()
    }

    pub(crate) fn steps(&self) -> Vec<StepCallData> {
        self.steps.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Responder for MockResponder {
    async fn respond(&self, response: &Claim) -> Result<(), FaultError> {
        if self.failing.contains(response) {
            return Err(FaultError::Transaction(anyhow::anyhow!("mock send failure")));
        }
        self.responses.lock().unwrap().push(*response);
        Ok(())
    }

    async fn step(&self, step_data: &StepCallData) -> Result<(), FaultError> {
        self.steps.lock().unwrap().push(step_data.clone());
        Ok(())
    }
}
