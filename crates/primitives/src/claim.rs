//! Types describing a single claim within a fault dispute game.

use crate::{Position, PositionError};
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// The [ClaimHash] type is an alias to [B256], used to deliniate a claim's commitment from a
/// regular hash.
pub type ClaimHash = B256;

/// The contract index of a claim that is not anchored on-chain. Claims built from the absolute
/// prestate, and moves that have not been observed on-chain yet, carry this index.
pub const ABSOLUTE_PRESTATE_INDEX: i64 = -1;

/// The [ClaimData] struct is the core of a claim: a commitment at a [Position]. It must be
/// unique within a single game, and doubles as the key of the claim tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimData {
    /// The commitment to the trace at the position.
    pub value: ClaimHash,
    /// The position of the claim within the game tree.
    pub position: Position,
}

impl ClaimData {
    /// Creates a new [ClaimData].
    pub const fn new(value: ClaimHash, position: Position) -> Self {
        Self { value, position }
    }

    /// Returns the commitment as a fixed 32 byte array.
    pub fn value_bytes(&self) -> [u8; 32] {
        self.value.0
    }
}

/// The [Claim] struct extends [ClaimData] with its relationship to the parent claim and its
/// location inside the dispute game contract.
///
/// The parent is held by value rather than by reference, so claims never form reference cycles.
/// For the root claim, `parent` is meaningless and left as [ClaimData::default].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// The claim itself.
    #[serde(flatten)]
    pub data: ClaimData,
    /// The claim that this claim counters.
    pub parent: ClaimData,
    /// The index of the claim in the contract's claim array, or [ABSOLUTE_PRESTATE_INDEX].
    pub contract_index: i64,
    /// The index of the parent claim in the contract's claim array.
    pub parent_contract_index: i64,
}

impl Claim {
    /// Creates the root [Claim] of a game.
    pub fn root(value: ClaimHash) -> Self {
        Self {
            data: ClaimData::new(value, Position::ROOT),
            parent: ClaimData::default(),
            contract_index: 0,
            parent_contract_index: 0,
        }
    }

    /// Creates the sentinel [Claim] that stands in for the absolute prestate of the game. It has
    /// no position in the tree, the dispute game contract supplies its value.
    pub fn absolute_prestate() -> Self {
        Self {
            data: ClaimData::default(),
            parent: ClaimData::default(),
            contract_index: ABSOLUTE_PRESTATE_INDEX,
            parent_contract_index: ABSOLUTE_PRESTATE_INDEX,
        }
    }

    /// Returns the commitment of the claim.
    pub const fn value(&self) -> ClaimHash {
        self.data.value
    }

    /// Returns the position of the claim.
    pub const fn position(&self) -> Position {
        self.data.position
    }

    /// Returns the depth of the claim's position.
    pub const fn depth(&self) -> u8 {
        self.data.position.depth()
    }

    /// Returns the index at depth of the claim's position.
    pub const fn index_at_depth(&self) -> u64 {
        self.data.position.index_at_depth()
    }

    /// Returns the trace index that the claim commits to.
    pub fn trace_index(&self, max_depth: u8) -> Result<u64, PositionError> {
        self.data.position.trace_index(max_depth)
    }

    /// Returns the commitment as a fixed 32 byte array.
    pub fn value_bytes(&self) -> [u8; 32] {
        self.data.value_bytes()
    }

    /// Returns `true` if this is the root claim.
    pub const fn is_root(&self) -> bool {
        self.data.position.is_root_position()
    }

    /// Returns `true` if this is the absolute prestate sentinel.
    pub const fn is_absolute_prestate(&self) -> bool {
        self.contract_index == ABSOLUTE_PRESTATE_INDEX
    }

    /// Returns `true` if the claim defends its parent (a move to the right, disputing a later
    /// point of the trace) and `false` if it attacks it (a move to the left).
    pub const fn defends_parent(&self) -> bool {
        (self.index_at_depth() >> 1) != self.parent.position.index_at_depth()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn value_bytes_copies_commitment() {
        let value = b256!("000000000000000000000000000000000000000000000000000000000000077a");
        let data = ClaimData::new(value, Position::ROOT);
        assert_eq!(data.value_bytes()[30..], [0x07, 0x7a]);
        assert_eq!(Claim::root(value).value_bytes(), value.0);
    }

    #[test]
    fn defends_parent_static() {
        let root = Claim::root(ClaimHash::ZERO);
        let attack = Claim {
            data: ClaimData::new(ClaimHash::ZERO, Position::new(1, 0)),
            parent: root.data,
            contract_index: 1,
            parent_contract_index: 0,
        };
        let defense = Claim {
            data: ClaimData::new(ClaimHash::ZERO, Position::new(2, 2)),
            parent: attack.data,
            contract_index: 2,
            parent_contract_index: 1,
        };
        let counter = Claim {
            data: ClaimData::new(ClaimHash::ZERO, Position::new(3, 4)),
            parent: defense.data,
            contract_index: 3,
            parent_contract_index: 2,
        };

        assert!(root.is_root());
        assert!(!attack.defends_parent());
        assert!(defense.defends_parent());
        assert!(!counter.defends_parent());
    }

    #[test]
    fn absolute_prestate_sentinel() {
        let sentinel = Claim::absolute_prestate();
        assert!(sentinel.is_absolute_prestate());
        assert!(!Claim::root(ClaimHash::ZERO).is_absolute_prestate());
    }

    #[test]
    fn claim_from_json() {
        let claim: Claim = serde_json::from_str(
            r#"{
                "value": "0x0000000000000000000000000000000000000000000000000000000000000578",
                "position": { "depth": 2, "indexAtDepth": 2 },
                "parent": {
                    "value": "0x0000000000000000000000000000000000000000000000000000000000000364",
                    "position": { "depth": 1, "indexAtDepth": 0 }
                },
                "contractIndex": 2,
                "parentContractIndex": 1
            }"#,
        )
        .unwrap();

        assert_eq!(claim.position(), Position::new(2, 2));
        assert_eq!(claim.parent.position, Position::new(1, 0));
        assert_eq!(claim.contract_index, 2);
        assert!(claim.defends_parent());
        assert_eq!(claim.trace_index(3).unwrap(), 5);
    }

    #[test]
    fn claim_from_json_rejects_bad_positions() {
        let json = |parent_position: &str| {
            format!(
                r#"{{
                    "value": "0x0000000000000000000000000000000000000000000000000000000000000578",
                    "position": {{ "depth": 2, "indexAtDepth": 2 }},
                    "parent": {{
                        "value": "0x0000000000000000000000000000000000000000000000000000000000000364",
                        "position": {parent_position}
                    }},
                    "contractIndex": 2,
                    "parentContractIndex": 1
                }}"#
            )
        };

        let parse = |parent_position: &str| serde_json::from_str::<Claim>(&json(parent_position));

        assert!(parse(r#"{ "depth": 1, "indexAtDepth": 0 }"#).is_ok());
        assert!(parse(r#"{ "depth": 1, "indexAtDepth": 2 }"#).is_err());
        assert!(parse(r#"{ "depth": 99, "indexAtDepth": 0 }"#).is_err());
    }
}
