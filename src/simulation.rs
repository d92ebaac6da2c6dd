//! Forward ray tracing over a fixed mirror configuration.
//!
//! These walks never branch: a ray enters at a border port, turns at every
//! mirror it meets and stops when its next step leaves the grid.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::geometry::{advance, cell_at, Cell, Mirror, Orientation, Port, Side};
use crate::grid::Grid;

/// Outcome of one ray walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Walk {
    /// In-grid cells in visiting order, mirror cells included.
    pub cells: Vec<Cell>,
    /// Product of the segment lengths.
    pub product: u64,
    /// The port the ray leaves through, `None` if it never left.
    pub exit: Option<Port>,
}

/// Walks a ray in from `port`, looking mirrors up with `mirror_at`.
///
/// A segment's length counts every step from its start (the entry or the
/// previous mirror) up to and including the step onto the next mirror or out
/// of the grid. The product saturates at `u64::MAX`. Each (cell, direction) pair can be visited once on a path
/// that started outside, so the walk gives up after `4 * size^2` cells.
pub(crate) fn walk<F>(port: Port, grid_size: usize, mirror_at: F) -> Walk
where
    F: Fn(Cell) -> Option<Orientation>,
{
    let (mut position, mut direction) = port.entry(grid_size);
    let max_cells = 4 * grid_size * grid_size;
    let mut cells = Vec::new();
    let mut product = 1u64;
    let mut segment = 0u64;

    loop {
        let next = advance(position, direction, 1);
        let Some(cell) = cell_at(next, grid_size) else {
            product = product.saturating_mul(segment + 1);
            return Walk {
                cells,
                product,
                exit: Port::from_exit(next, grid_size),
            };
        };
        if cells.len() == max_cells {
            return Walk {
                cells,
                product,
                exit: None,
            };
        }

        cells.push(cell);
        position = next;
        match mirror_at(cell) {
            Some(orientation) => {
                product = product.saturating_mul(segment + 1);
                segment = 0;
                direction = orientation.reflect(direction);
            }
            None => segment += 1,
        }
    }
}

/// Mirror lookup table for a configuration.
pub(crate) fn mirror_map(mirrors: &[Mirror]) -> FxHashMap<Cell, Orientation> {
    mirrors
        .iter()
        .map(|mirror| (mirror.cell(), mirror.orientation))
        .collect()
}

/// Cells visited by a ray entering at `side`/`index` through `mirrors`.
pub fn trace_cells(
    side: Side,
    index: usize,
    mirrors: &[Mirror],
    grid_size: usize,
) -> Result<Vec<Cell>> {
    let port = Port::new(side, index);
    port.validate(grid_size)?;
    let lookup = mirror_map(mirrors);
    Ok(walk(port, grid_size, |cell| lookup.get(&cell).copied()).cells)
}

/// Segment-length product of a ray entering at `side`/`index` on a grid.
pub fn trace_product(grid: &Grid, side: Side, index: usize) -> Result<u64> {
    let port = Port::new(side, index);
    port.validate(grid.size())?;
    Ok(walk(port, grid.size(), |cell| grid.mirror_at(cell)).product)
}

/// Trace products for every border port of a grid.
pub fn border_products(grid: &Grid) -> BTreeMap<Port, u64> {
    Port::all(grid.size())
        .map(|port| {
            let product = walk(port, grid.size(), |cell| grid.mirror_at(cell)).product;
            (port, product)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MirrorError;
    use crate::geometry::touching;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grid_with(size: usize, mirrors: &[Mirror]) -> Grid {
        Grid::from_path(size, &[], mirrors)
    }

    #[test]
    fn test_straight_ray_crosses_grid() {
        let cells = trace_cells(Side::Top, 0, &[], 5).unwrap();
        assert_eq!(cells, vec![(0, 4), (0, 3), (0, 2), (0, 1), (0, 0)]);
        assert_eq!(trace_product(&Grid::new(5), Side::Top, 0).unwrap(), 6);
    }

    #[test]
    fn test_corner_mirror_gives_one() {
        let mirrors = [Mirror::new(0, 4, Orientation::A)];
        assert_eq!(trace_cells(Side::Top, 0, &mirrors, 5).unwrap(), vec![(0, 4)]);
        let grid = grid_with(5, &mirrors);
        assert_eq!(trace_product(&grid, Side::Top, 0).unwrap(), 1);
        assert_eq!(trace_product(&grid, Side::Left, 4).unwrap(), 1);
    }

    #[test]
    fn test_two_mirror_zigzag() {
        // enters the left border on row 1, turns up at (2, 1), right at (2, 3)
        let mirrors = [
            Mirror::new(2, 1, Orientation::A),
            Mirror::new(2, 3, Orientation::A),
        ];
        let cells = trace_cells(Side::Left, 1, &mirrors, 5).unwrap();
        assert_eq!(
            cells,
            vec![(0, 1), (1, 1), (2, 1), (2, 2), (2, 3), (3, 3), (4, 3)]
        );
        let grid = grid_with(5, &mirrors);
        assert_eq!(trace_product(&grid, Side::Left, 1).unwrap(), 3 * 2 * 3);
        // the same path read backwards
        assert_eq!(trace_product(&grid, Side::Right, 3).unwrap(), 18);
    }

    #[test]
    fn test_border_products_cover_every_port() {
        let products = border_products(&Grid::new(3));
        assert_eq!(products.len(), 12);
        assert!(products.values().all(|&p| p == 4));
    }

    #[test]
    fn test_invalid_ports_are_rejected() {
        assert!(matches!(
            trace_cells(Side::Bottom, 5, &[], 5),
            Err(MirrorError::IndexOutOfRange { index: 5, grid_size: 5 })
        ));
        assert!(matches!(
            trace_product(&Grid::new(0), Side::Top, 0),
            Err(MirrorError::EmptyGrid)
        ));
    }

    #[test]
    fn test_rays_always_leave_and_retrace_backwards() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let size = 6;
            let mut mirrors: Vec<Mirror> = Vec::new();
            for _ in 0..8 {
                let cell = (rng.gen_range(0..size), rng.gen_range(0..size));
                if mirrors
                    .iter()
                    .all(|m| m.cell() != cell && !touching(m.cell(), cell))
                {
                    let orientation = if rng.gen_bool(0.5) {
                        Orientation::A
                    } else {
                        Orientation::B
                    };
                    mirrors.push(Mirror::new(cell.0, cell.1, orientation));
                }
            }
            let lookup = mirror_map(&mirrors);
            for port in Port::all(size) {
                let forward = walk(port, size, |cell| lookup.get(&cell).copied());
                let exit = forward.exit.expect("ray entering from the border must leave");
                let backward = walk(exit, size, |cell| lookup.get(&cell).copied());
                assert_eq!(backward.exit, Some(port));
                assert_eq!(backward.product, forward.product);
                let mut reversed = forward.cells.clone();
                reversed.reverse();
                assert_eq!(backward.cells, reversed);
            }
        }
    }
}
