#![doc = include_str!("../README.md")]

//! Primitives for Narya, a library for playing the OP Stack's fault dispute game: tree
//! positions, claims, and rule composition.

mod position;
pub use position::{Position, PositionError, MAX_GAME_DEPTH};

mod claim;
pub use claim::{Claim, ClaimData, ClaimHash, ABSOLUTE_PRESTATE_INDEX};

pub mod rule;
