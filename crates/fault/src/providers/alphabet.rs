//! This module contains the implementation of the [crate::TraceProvider] trait for the mock
//! Alphabet VM, whose trace is a string of letters: each step of the VM moves to the next letter.

use crate::{FaultError, TraceProvider};
use alloy_primitives::U256;
use narya_primitives::{ClaimHash, MAX_GAME_DEPTH};

/// The [AlphabetTraceProvider] is a [TraceProvider] that serves the trace of the mock Alphabet VM.
/// The commitment at trace index `i` is the big-endian index followed by the letter, so index 7
/// with the letter `h` commits to `0x…0768`.
#[derive(Debug, Clone)]
pub struct AlphabetTraceProvider {
    /// The letters of the trace, one per VM step.
    state: Vec<u8>,
    /// The number of steps in a full trace at the game's max depth.
    max_len: u64,
}

impl AlphabetTraceProvider {
    /// Creates a new [AlphabetTraceProvider] for a tree of the given depth. Depths past
    /// [MAX_GAME_DEPTH] are clamped to it.
    pub fn new(state: impl AsRef<str>, depth: u8) -> Self {
        Self {
            state: state.as_ref().as_bytes().to_vec(),
            max_len: 1 << depth.min(MAX_GAME_DEPTH),
        }
    }

    fn empty_trace() -> FaultError {
        FaultError::Provider(anyhow::anyhow!("alphabet trace is empty"))
    }
}

impl TraceProvider for AlphabetTraceProvider {
    fn get(&self, i: u64) -> Result<ClaimHash, FaultError> {
        let preimage = self.preimage(i)?;
        let mut claim = [0u8; 32];
        let len = preimage.len().min(32);
        claim[32 - len..].copy_from_slice(&preimage[preimage.len() - len..]);
        Ok(claim.into())
    }

    fn preimage(&self, i: u64) -> Result<Vec<u8>, FaultError> {
        if i >= self.max_len {
            return Err(FaultError::IndexTooLarge);
        }
        // Traces shorter than the tree repeat their final state up to the max depth.
        let last = self.state.len().checked_sub(1).ok_or_else(Self::empty_trace)?;
        let index = usize::try_from(i).map_or(last, |i| i.min(last));

        let index_bytes = (index as u64).to_be_bytes();
        let skip = index_bytes.iter().take_while(|b| **b == 0).count();
        let mut preimage = index_bytes[skip..].to_vec();
        preimage.push(self.state[index]);
        Ok(preimage)
    }

    fn absolute_prestate(&self) -> Result<Vec<u8>, FaultError> {
        let first = self.state.first().ok_or_else(Self::empty_trace)?;
        Ok(U256::from(first.wrapping_sub(1)).to_be_bytes::<32>().to_vec())
    }
}
