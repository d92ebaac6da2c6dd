//! Layer grids and the rules for stacking them.
//!
//! Every clue contributes candidate layers; a layer marks the cells its ray
//! lights up, its mirrors, and the cells next to those mirrors. The search
//! checks each layer against the grid accumulated so far and merges it in.
//! The grid is a flat row-major vector, row 0 at the bottom.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{neighbors, Cell, Mirror, Orientation};

/// What a layer knows about one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Illuminated,
    Mirror(Orientation),
    AdjacentToMirror,
}

impl CellState {
    #[inline(always)]
    pub const fn is_mirror(self) -> bool {
        matches!(self, CellState::Mirror(_))
    }

    /// Character used when printing a grid.
    pub const fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Illuminated => '*',
            CellState::Mirror(orientation) => orientation.symbol(),
            CellState::AdjacentToMirror => '+',
        }
    }
}

/// A square grid of cell states.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    /// Builds a layer from a ray's trajectory and the mirrors along it.
    ///
    /// Mirrors overwrite illuminated cells, and mirror neighbours are marked
    /// `AdjacentToMirror` last so that later layers see the no-touching rule.
    pub fn from_path(size: usize, trajectory: &[Cell], mirrors: &[Mirror]) -> Self {
        let mut grid = Self::new(size);
        for &cell in trajectory {
            grid.set(cell, CellState::Illuminated);
        }
        for mirror in mirrors {
            grid.set(mirror.cell(), CellState::Mirror(mirror.orientation));
            for neighbor in neighbors(mirror.cell(), size) {
                grid.set(neighbor, CellState::AdjacentToMirror);
            }
        }
        grid
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, (col, row): Cell) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> CellState {
        self.cells[self.index(cell)]
    }

    #[inline]
    pub fn set(&mut self, cell: Cell, state: CellState) {
        let index = self.index(cell);
        self.cells[index] = state;
    }

    /// Orientation of the mirror at `cell`, if there is one.
    #[inline]
    pub fn mirror_at(&self, cell: Cell) -> Option<Orientation> {
        match self.get(cell) {
            CellState::Mirror(orientation) => Some(orientation),
            _ => None,
        }
    }

    /// All mirrors on the grid, row-major from the bottom-left.
    pub fn mirrors(&self) -> Vec<Mirror> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, state)| match *state {
                CellState::Mirror(orientation) => {
                    Some(Mirror::new(index % self.size, index / self.size, orientation))
                }
                _ => None,
            })
            .collect()
    }

    /// Checks whether `candidate` can be stacked on top of this grid.
    ///
    /// Two mirrors may share a cell only with the same orientation: that is
    /// two rays bouncing off the same mirror.
    pub fn compatible(&self, candidate: &Grid) -> bool {
        debug_assert_eq!(self.size, candidate.size);
        self.cells
            .iter()
            .zip(&candidate.cells)
            .all(|(&base, &layer)| match layer {
                CellState::Empty => true,
                CellState::Illuminated | CellState::AdjacentToMirror => !base.is_mirror(),
                CellState::Mirror(orientation) => match base {
                    CellState::Empty => true,
                    CellState::Mirror(existing) => existing == orientation,
                    CellState::Illuminated | CellState::AdjacentToMirror => false,
                },
            })
    }

    /// Stacks `candidate` on this grid and returns the result.
    ///
    /// Empty cells take the candidate's state, and a candidate
    /// `AdjacentToMirror` always wins: a cell that one layer lit may still be
    /// forbidden for mirrors because of another layer's mirror.
    pub fn merge(&self, candidate: &Grid) -> Grid {
        debug_assert_eq!(self.size, candidate.size);
        let cells = self
            .cells
            .iter()
            .zip(&candidate.cells)
            .map(|(&base, &layer)| match (base, layer) {
                (_, CellState::AdjacentToMirror) => CellState::AdjacentToMirror,
                (CellState::Empty, layer) => layer,
                (base, _) => base,
            })
            .collect();
        Grid {
            size: self.size,
            cells,
        }
    }

    /// Rows as strings, top row first.
    pub fn rows(&self) -> Vec<String> {
        (0..self.size)
            .rev()
            .map(|row| {
                (0..self.size)
                    .map(|col| self.get((col, row)).symbol())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.rows() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn layer_with_mirror(size: usize, col: usize, row: usize, orientation: Orientation) -> Grid {
        Grid::from_path(size, &[], &[Mirror::new(col, row, orientation)])
    }

    /// A random set of mirrors, none touching and none shared with `taken`.
    fn random_layer(rng: &mut StdRng, size: usize, taken: &mut Vec<Cell>) -> Grid {
        let mut mirrors = Vec::new();
        for _ in 0..3 {
            let cell = (rng.gen_range(0..size), rng.gen_range(0..size));
            let clear = taken
                .iter()
                .all(|&other| other != cell && !crate::geometry::touching(other, cell));
            if clear {
                let orientation = if rng.gen_bool(0.5) {
                    Orientation::A
                } else {
                    Orientation::B
                };
                taken.push(cell);
                mirrors.push(Mirror::new(cell.0, cell.1, orientation));
            }
        }
        Grid::from_path(size, &[], &mirrors)
    }

    #[test]
    fn test_from_path_marks_neighbors_over_light() {
        let trajectory = [(0, 2), (1, 2), (2, 2), (2, 1), (2, 0)];
        let grid = Grid::from_path(3, &trajectory, &[Mirror::new(2, 2, Orientation::B)]);
        insta::assert_snapshot!(grid.to_string(), @r"
        *+\
        ..+
        ..*
        ");
    }

    #[test]
    fn test_light_conflicts_with_mirror() {
        let base = layer_with_mirror(4, 1, 1, Orientation::A);
        let lit = Grid::from_path(4, &[(1, 0), (1, 1), (1, 2)], &[]);
        assert!(!base.compatible(&lit));
        assert!(!lit.compatible(&base));
    }

    #[test]
    fn test_shared_mirror_needs_same_orientation() {
        let a = layer_with_mirror(4, 2, 2, Orientation::A);
        let also_a = layer_with_mirror(4, 2, 2, Orientation::A);
        let b = layer_with_mirror(4, 2, 2, Orientation::B);
        assert!(a.compatible(&also_a));
        assert!(!a.compatible(&b));
    }

    #[test]
    fn test_touching_mirrors_conflict() {
        let base = layer_with_mirror(4, 1, 1, Orientation::A);
        let beside = layer_with_mirror(4, 2, 1, Orientation::A);
        assert!(!base.compatible(&beside));
        assert!(!beside.compatible(&base));
    }

    #[test]
    fn test_merge_keeps_adjacency_over_light() {
        let lit = Grid::from_path(3, &[(0, 1), (1, 1), (2, 1)], &[]);
        let mirror = layer_with_mirror(3, 1, 2, Orientation::B);
        let merged = lit.merge(&mirror);
        assert_eq!(merged.get((1, 1)), CellState::AdjacentToMirror);
        assert_eq!(merged.get((0, 1)), CellState::Illuminated);
        assert_eq!(merged.mirror_at((1, 2)), Some(Orientation::B));
        assert_eq!(merged.mirrors(), vec![Mirror::new(1, 2, Orientation::B)]);
    }

    #[test]
    fn test_merge_is_associative_for_compatible_layers() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut taken = Vec::new();
            let a = random_layer(&mut rng, 6, &mut taken);
            let b = random_layer(&mut rng, 6, &mut taken);
            let c = random_layer(&mut rng, 6, &mut taken);
            assert!(a.compatible(&b) && a.merge(&b).compatible(&c));
            assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        }
    }

    #[test]
    fn test_compatible_is_symmetric_for_disjoint_layers() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut taken = Vec::new();
            let a = random_layer(&mut rng, 5, &mut taken);
            let b = random_layer(&mut rng, 5, &mut taken);
            assert_eq!(a.compatible(&b), b.compatible(&a));
        }
    }

    #[test]
    fn test_empty_candidate_never_conflicts() {
        let base = Grid::from_path(3, &[(0, 0), (1, 0)], &[Mirror::new(2, 2, Orientation::A)]);
        assert!(base.compatible(&Grid::new(3)));
        assert_eq!(base.merge(&Grid::new(3)), base);
    }
}
