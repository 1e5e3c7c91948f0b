//! Configuration of a fault game agent.

use crate::FaultError;
use alloy_primitives::Address;
use narya_primitives::MAX_GAME_DEPTH;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The [FaultConfig] names the dispute game an agent plays and how it plays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultConfig {
    /// The address of the FaultDisputeGame contract.
    pub game_address: Address,
    /// The max depth of the game's position tree.
    pub max_depth: u8,
    /// Upper bound on the wait for a transaction to be included.
    #[serde(default)]
    pub send_timeout: Option<Duration>,
}

impl FaultConfig {
    pub fn new(game_address: Address, max_depth: u8) -> Self {
        Self {
            game_address,
            max_depth,
            send_timeout: None,
        }
    }

    /// Checks that the max depth describes a tree with at least one move and whose trace indices
    /// fit in a `u64`.
    pub fn validate(&self) -> Result<(), FaultError> {
        if self.max_depth == 0 || self.max_depth > MAX_GAME_DEPTH {
            return Err(FaultError::InvalidConfig(format!(
                "max depth must be within 1..={MAX_GAME_DEPTH}, got {}",
                self.max_depth
            )));
        }
        Ok(())
    }
}
