//! Puzzle definitions: clues, grid size and factorization bounds.
//!
//! The two reference puzzles are kept as constant clue tables. Other puzzles
//! can be loaded from JSON:
//!
//! ```json
//! { "name": "small", "grid_size": 5, "max_len": 12, "max_factor": 6,
//!   "clues": [ { "number": 9, "side": "top", "index": 2 } ] }
//! ```

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, Result};
use crate::factorization::FactorBounds;
use crate::geometry::{Port, Side};

/// Border port → number of the clue sitting there.
pub type BoundaryOwners = FxHashMap<Port, u64>;

/// A numbered clue on the border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clue {
    pub number: u64,
    #[serde(flatten)]
    pub port: Port,
}

impl Clue {
    pub const fn new(number: u64, side: Side, index: usize) -> Self {
        Self {
            number,
            port: Port::new(side, index),
        }
    }
}

/// A complete puzzle definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub name: String,
    pub grid_size: usize,
    #[serde(flatten)]
    pub bounds: FactorBounds,
    pub clues: Vec<Clue>,
}

impl Puzzle {
    pub fn new(name: &str, grid_size: usize, bounds: FactorBounds, clues: &[Clue]) -> Self {
        Self {
            name: name.to_string(),
            grid_size,
            bounds,
            clues: clues.to_vec(),
        }
    }

    /// Rejects empty grids, zero clues, off-border indices and clues that
    /// share a port.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(MirrorError::EmptyGrid);
        }
        let mut seen = FxHashSet::default();
        for clue in &self.clues {
            if clue.number == 0 {
                return Err(MirrorError::ZeroClue);
            }
            clue.port.validate(self.grid_size)?;
            if !seen.insert(clue.port) {
                return Err(MirrorError::DuplicatePort(clue.port));
            }
        }
        Ok(())
    }

    pub fn boundary_owners(&self) -> BoundaryOwners {
        self.clues
            .iter()
            .map(|clue| (clue.port, clue.number))
            .collect()
    }

    /// Whether a clue sits on `port`.
    pub fn is_clue_port(&self, port: Port) -> bool {
        self.clues.iter().any(|clue| clue.port == port)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let puzzle: Puzzle = serde_json::from_str(json)?;
        puzzle.validate()?;
        Ok(puzzle)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Clues of the 5x5 reference puzzle.
pub const SMALL_CLUES: &[Clue] = &[
    Clue::new(9, Side::Top, 2),
    Clue::new(16, Side::Left, 1),
    Clue::new(75, Side::Right, 3),
    Clue::new(36, Side::Bottom, 2),
];

pub const SMALL_GRID_SIZE: usize = 5;
pub const SMALL_BOUNDS: FactorBounds = FactorBounds::new(12, 6);

/// Clues of the 10x10 reference puzzle.
pub const LARGE_CLUES: &[Clue] = &[
    Clue::new(112, Side::Top, 2),
    Clue::new(48, Side::Top, 4),
    Clue::new(3087, Side::Top, 5),
    Clue::new(9, Side::Top, 6),
    Clue::new(1, Side::Top, 9),
    Clue::new(27, Side::Left, 6),
    Clue::new(12, Side::Left, 2),
    Clue::new(225, Side::Left, 1),
    Clue::new(2025, Side::Bottom, 0),
    Clue::new(12, Side::Bottom, 3),
    Clue::new(64, Side::Bottom, 4),
    Clue::new(5, Side::Bottom, 5),
    Clue::new(405, Side::Bottom, 7),
    Clue::new(4, Side::Right, 8),
    Clue::new(27, Side::Right, 7),
    Clue::new(16, Side::Right, 3),
];

pub const LARGE_GRID_SIZE: usize = 10;
pub const LARGE_BOUNDS: FactorBounds = FactorBounds::new(50, 11);

/// The 5x5 reference puzzle.
pub fn small() -> Puzzle {
    Puzzle::new("small", SMALL_GRID_SIZE, SMALL_BOUNDS, SMALL_CLUES)
}

/// The 10x10 reference puzzle.
pub fn large() -> Puzzle {
    Puzzle::new("large", LARGE_GRID_SIZE, LARGE_BOUNDS, LARGE_CLUES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_puzzles_are_valid() {
        small().validate().unwrap();
        large().validate().unwrap();
        assert_eq!(large().clues.len(), 16);
    }

    #[test]
    fn test_duplicate_numbers_keep_their_own_ports() {
        let owners = large().boundary_owners();
        assert_eq!(owners[&Port::new(Side::Left, 6)], 27);
        assert_eq!(owners[&Port::new(Side::Right, 7)], 27);
        assert_eq!(owners[&Port::new(Side::Left, 2)], 12);
        assert_eq!(owners[&Port::new(Side::Bottom, 3)], 12);
        assert_eq!(owners.len(), 16);
    }

    #[test]
    fn test_json_roundtrip_format() {
        let json = r#"{
            "name": "tiny",
            "grid_size": 3,
            "max_len": 4,
            "max_factor": 4,
            "clues": [ { "number": 4, "side": "left", "index": 1 } ]
        }"#;
        let puzzle = Puzzle::from_json_str(json).unwrap();
        assert_eq!(puzzle.bounds, FactorBounds::new(4, 4));
        assert_eq!(puzzle.clues, vec![Clue::new(4, Side::Left, 1)]);
        assert!(puzzle.is_clue_port(Port::new(Side::Left, 1)));
    }

    #[test]
    fn test_invalid_definitions_fail_fast() {
        let mut puzzle = small();
        puzzle.clues.push(Clue::new(4, Side::Top, 2));
        assert!(matches!(
            puzzle.validate(),
            Err(MirrorError::DuplicatePort(port)) if port == Port::new(Side::Top, 2)
        ));

        let off_border = Puzzle::new("off", 3, SMALL_BOUNDS, &[Clue::new(4, Side::Right, 3)]);
        assert!(matches!(
            off_border.validate(),
            Err(MirrorError::IndexOutOfRange { index: 3, grid_size: 3 })
        ));

        let zero = Puzzle::new("zero", 3, SMALL_BOUNDS, &[Clue::new(0, Side::Right, 0)]);
        assert!(matches!(zero.validate(), Err(MirrorError::ZeroClue)));

        let bad_side = r#"{ "name": "x", "grid_size": 3, "max_len": 2, "max_factor": 2,
            "clues": [ { "number": 4, "side": "north", "index": 0 } ] }"#;
        assert!(matches!(Puzzle::from_json_str(bad_side), Err(MirrorError::Json(_))));
    }
}
