//! The position module holds the [Position] type, a coordinate within the bisection tree of a
//! fault dispute game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The deepest tree supported by [Position]. Trace indices at this depth still fit in a `u64`.
pub const MAX_GAME_DEPTH: u8 = 63;

/// Errors raised by the checked [Position] constructors and navigation methods.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    /// The depth exceeds [MAX_GAME_DEPTH].
    #[error("depth {0} exceeds the maximum game depth")]
    DepthTooLarge(u8),
    /// The index at depth does not fit within `2^depth`.
    #[error("index {index} is out of range at depth {depth}")]
    IndexTooLarge {
        /// The depth of the rejected position.
        depth: u8,
        /// The rejected index at depth.
        index: u64,
    },
    /// The position lies below the max depth of the game it is used in.
    #[error("depth {depth} is beyond the max game depth {max_depth}")]
    BeyondMaxDepth {
        /// The depth of the rejected position.
        depth: u8,
        /// The max depth of the game.
        max_depth: u8,
    },
    /// The root position cannot be defended, it has no parent to agree with.
    #[error("the root position cannot be defended")]
    RootDefense,
}

/// A [Position] is a `(depth, index_at_depth)` pair within a complete binary tree. Positions are
/// value types, compared and hashed structurally, and ordered by depth first.
///
/// Deserialization goes through [Position::try_new].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase", try_from = "RawPosition")]
pub struct Position {
    depth: u8,
    index_at_depth: u64,
}

/// The unchecked wire form of a [Position].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPosition {
    depth: u8,
    index_at_depth: u64,
}

impl TryFrom<RawPosition> for Position {
    type Error = PositionError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::try_new(raw.depth, raw.index_at_depth)
    }
}

impl Position {
    /// The root of every game tree.
    pub const ROOT: Position = Position::new(0, 0);

    /// Creates a new [Position] without validating it. Prefer [Position::try_new] for input
    /// coming from outside of the process.
    pub const fn new(depth: u8, index_at_depth: u64) -> Self {
        Self {
            depth,
            index_at_depth,
        }
    }

    /// Creates a new [Position], checking that the depth is supported and that the index fits
    /// at that depth.
    pub fn try_new(depth: u8, index_at_depth: u64) -> Result<Self, PositionError> {
        if depth > MAX_GAME_DEPTH {
            return Err(PositionError::DepthTooLarge(depth));
        }
        if index_at_depth >= 1u64 << depth {
            return Err(PositionError::IndexTooLarge {
                depth,
                index: index_at_depth,
            });
        }
        Ok(Self::new(depth, index_at_depth))
    }

    /// Checks that the [Position] is valid within a tree of depth `max_depth`.
    pub fn check_within(&self, max_depth: u8) -> Result<(), PositionError> {
        if max_depth > MAX_GAME_DEPTH {
            return Err(PositionError::DepthTooLarge(max_depth));
        }
        if self.depth > max_depth {
            return Err(PositionError::BeyondMaxDepth {
                depth: self.depth,
                max_depth,
            });
        }
        Self::try_new(self.depth, self.index_at_depth).map(|_| ())
    }

    /// Returns the depth of the [Position] within the tree.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Returns the index at depth of the [Position] within the tree.
    pub const fn index_at_depth(&self) -> u64 {
        self.index_at_depth
    }

    /// Returns `true` if this is the root position `(0, 0)`.
    pub const fn is_root_position(&self) -> bool {
        self.depth == 0 && self.index_at_depth == 0
    }

    /// Returns the parent [Position], or [None] for the root.
    pub const fn parent(&self) -> Option<Self> {
        if self.depth == 0 {
            return None;
        }
        Some(Self::new(self.depth - 1, self.index_at_depth >> 1))
    }

    /// Returns the [Position] of an attack against the current [Position]: its left child.
    pub const fn attack(&self) -> Self {
        self.step_down(false)
    }

    /// Returns the [Position] of a defense of the current [Position]: the left child of its
    /// right sibling.
    pub fn defend(&self) -> Result<Self, PositionError> {
        let parent = self.parent().ok_or(PositionError::RootDefense)?;
        Ok(parent.step_down(true).step_down(false))
    }

    /// Returns the [Position] for an attack or defense move against the current [Position].
    pub fn make_move(&self, is_attack: bool) -> Result<Self, PositionError> {
        if is_attack {
            Ok(self.attack())
        } else {
            self.defend()
        }
    }

    /// Returns the generalized index of the [Position]: `2^{depth} + index_at_depth`.
    pub const fn gindex(&self) -> u128 {
        (1u128 << self.depth) + self.index_at_depth as u128
    }

    /// Builds a [Position] from its generalized index. Returns [None] for `0`, which is not a
    /// valid generalized index.
    pub fn from_gindex(gindex: u128) -> Option<Self> {
        if gindex == 0 {
            return None;
        }
        let depth = (127 - gindex.leading_zeros()) as u8;
        Self::try_new(depth, (gindex - (1 << depth)) as u64).ok()
    }

    /// Returns the rightmost [Position] at `max_depth` that commits to the same trace index as
    /// the current [Position].
    pub fn right_index(&self, max_depth: u8) -> Result<Self, PositionError> {
        Ok(Self::new(max_depth, self.trace_index(max_depth)?))
    }

    /// Returns the index of the trace commitment that the current [Position] commits to. This is
    /// the index reached by moving right until `max_depth`.
    ///
    /// Fails if the position is not valid within a tree of depth `max_depth`.
    pub fn trace_index(&self, max_depth: u8) -> Result<u64, PositionError> {
        self.check_within(max_depth)?;
        let remaining = u32::from(max_depth - self.depth);
        Ok((self.index_at_depth << remaining) | ((1u64 << remaining) - 1))
    }

    const fn step_down(&self, right: bool) -> Self {
        Self::new(self.depth + 1, (self.index_at_depth << 1) | right as u64)
    }
}
