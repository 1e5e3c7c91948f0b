//! This module contains the in-memory representation of a fault dispute game's claim tree.

use crate::FaultError;
use narya_primitives::{chain_rules, Claim, ClaimData, ClaimHash};
use std::collections::{HashMap, VecDeque};

/// A claim within the [GameState], along with the claims that counter it.
#[derive(Debug, Clone)]
struct ClaimNode {
    claim: Claim,
    /// Counters to the claim, in insertion order.
    children: Vec<ClaimData>,
}

/// The [GameState] struct holds the claim tree of a single dispute game.
///
/// Claims are keyed by their [ClaimData] and refer to their parent by value, so the tree holds no
/// references and is cheap to snapshot with [Clone]. The state is not synchronized; it expects a
/// single writer per game.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The root claim commits to the entirety of the backend VM's trace.
    root: Claim,
    /// Every claim in the game, including the root.
    claims: HashMap<ClaimData, ClaimNode>,
    /// The max depth of the position tree.
    max_depth: u8,
}

impl GameState {
    /// Creates a new [GameState] rooted at `root`.
    pub fn new(root: Claim, max_depth: u8) -> Self {
        let mut claims = HashMap::new();
        claims.insert(
            root.data,
            ClaimNode {
                claim: root,
                children: Vec::new(),
            },
        );
        Self {
            root,
            claims,
            max_depth,
        }
    }

    /// Returns the root [Claim] of the game.
    pub const fn root_claim(&self) -> Claim {
        self.root
    }

    /// Returns the commitment of the root claim.
    pub const fn root_value(&self) -> ClaimHash {
        self.root.data.value
    }

    /// Returns the max depth of the position tree.
    pub const fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Returns the number of claims in the game, including the root.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns `true` if the game only holds its root claim.
    pub fn is_empty(&self) -> bool {
        self.claims.len() == 1
    }

    /// Adds a claim to the game. The claim's position must lie within the game tree, the root can
    /// never be re-inserted, and the claim's parent must already be present.
    pub fn put(&mut self, claim: Claim) -> Result<(), FaultError> {
        let claim = chain_rules!(
            claim,
            |c: Claim| {
                c.position()
                    .check_within(self.max_depth)
                    .map(|_| c)
                    .map_err(FaultError::from)
            },
            |c: Claim| {
                if c.is_root() || self.is_duplicate(&c) {
                    Err(FaultError::ClaimExists)
                } else {
                    Ok(c)
                }
            },
            |c: Claim| {
                if self.claims.contains_key(&c.parent) {
                    Ok(c)
                } else {
                    Err(FaultError::NoParentClaim)
                }
            }
        )?;

        self.claims
            .get_mut(&claim.parent)
            .ok_or(FaultError::NoParentClaim)?
            .children
            .push(claim.data);
        self.claims.insert(
            claim.data,
            ClaimNode {
                claim,
                children: Vec::new(),
            },
        );
        Ok(())
    }

    /// Adds a list of claims to the game, in order, stopping at the first failure. Claims
    /// inserted before the failing one stay in the game.
    pub fn put_all(&mut self, claims: &[Claim]) -> Result<(), FaultError> {
        claims.iter().try_for_each(|claim| self.put(*claim))
    }

    /// Returns `true` if a claim with the same [ClaimData] is already in the game.
    pub fn is_duplicate(&self, claim: &Claim) -> bool {
        self.claims.contains_key(&claim.data)
    }

    /// Returns every claim in the game, walking the tree breadth first from the root.
    pub fn claims(&self) -> Vec<Claim> {
        let mut queue = VecDeque::from([self.root.data]);
        let mut out = Vec::with_capacity(self.claims.len());
        while let Some(item) = queue.pop_front() {
            if let Some(node) = self.claims.get(&item) {
                queue.extend(node.children.iter().copied());
                out.push(node.claim);
            }
        }
        out
    }

    /// Returns the claim which commits to the pre-state of the leaf `claim`.
    ///
    /// The leftmost leaf has no pre-state in the tree; it returns the
    /// [Claim::absolute_prestate] sentinel, whose value comes from the dispute game contract.
    pub fn pre_state_claim(&self, claim: &Claim) -> Result<Claim, FaultError> {
        self.ensure_leaf(claim)?;
        if claim.index_at_depth() == 0 {
            return Ok(Claim::absolute_prestate());
        }

        // Walk up until we reach a claim that defends its parent; that parent sits directly to
        // the left of the leaf.
        let mut current = *claim;
        loop {
            let parent = self.parent(&current)?;
            if current.defends_parent() {
                return Ok(parent);
            }
            current = parent;
        }
    }

    /// Returns the claim which commits to the post-state of the leaf `claim`.
    pub fn post_state_claim(&self, claim: &Claim) -> Result<Claim, FaultError> {
        self.ensure_leaf(claim)?;

        // Mirror of the pre-state walk: the first attacked parent sits directly to the right.
        let mut current = *claim;
        loop {
            let parent = self.parent(&current)?;
            if !current.defends_parent() {
                return Ok(parent);
            }
            current = parent;
        }
    }

    /// Returns the parent of `claim`. The root has no parent.
    pub(crate) fn parent(&self, claim: &Claim) -> Result<Claim, FaultError> {
        if claim.is_root() {
            return Err(FaultError::ClaimNotFound);
        }
        self.claims
            .get(&claim.parent)
            .map(|node| node.claim)
            .ok_or(FaultError::ClaimNotFound)
    }

    fn ensure_leaf(&self, claim: &Claim) -> Result<(), FaultError> {
        if claim.depth() == self.max_depth {
            Ok(())
        } else {
            Err(FaultError::NotLeafClaim)
        }
    }
}
