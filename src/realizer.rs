//! Turning a factorization into concrete mirror placements.
//!
//! Every segment but the last must stop on a cell inside the grid, where a
//! mirror of either orientation turns the ray. The last segment must stop
//! exactly one step outside the grid. The search over orientations is a
//! depth-first walk with an explicit stack, orientation `A` explored first.

use crate::geometry::{
    advance, cell_at, touching, Cell, Direction, Mirror, Orientation, Point, Port,
};
use crate::grid::Grid;
use crate::puzzles::{BoundaryOwners, Clue};
use crate::simulation::{mirror_map, walk};

/// One way of realizing a clue: its mirrors and the layer they produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub mirrors: Vec<Mirror>,
    pub grid: Grid,
}

/// A partially walked path in the realizer's search stack.
struct PartialPath {
    /// Index of the next factor to lay down.
    next_factor: usize,
    position: Point,
    direction: Direction,
    mirrors: Vec<Mirror>,
    trajectory: Vec<Cell>,
}

/// All candidates for `clue` whose segment lengths are exactly `factors`.
///
/// `owners` maps border ports to clue numbers; a path may not leave through
/// a port that belongs to a clue with a different number.
pub fn realize(
    factors: &[u64],
    clue: &Clue,
    grid_size: usize,
    owners: &BoundaryOwners,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let Some(last) = factors.len().checked_sub(1) else {
        return candidates;
    };
    // no straight segment in an n-grid is longer than n + 1
    let longest = grid_size as u64 + 1;
    if factors.iter().any(|&factor| factor > longest) {
        return candidates;
    }

    let (entry, inward) = clue.port.entry(grid_size);
    let mut search_stack = vec![PartialPath {
        next_factor: 0,
        position: entry,
        direction: inward,
        mirrors: Vec::new(),
        trajectory: Vec::new(),
    }];

    while let Some(partial) = search_stack.pop() {
        let Ok(length) = i32::try_from(factors[partial.next_factor]) else {
            continue;
        };
        let end = advance(partial.position, partial.direction, length);

        let mut trajectory = partial.trajectory;
        trajectory.extend((1..=length).filter_map(|step| {
            cell_at(advance(partial.position, partial.direction, step), grid_size)
        }));

        if partial.next_factor < last {
            // turning point: must be inside and clear of this path's mirrors
            let Some(turn) = cell_at(end, grid_size) else {
                continue;
            };
            if partial.mirrors.iter().any(|mirror| touching(mirror.cell(), turn)) {
                continue;
            }

            // pushed in reverse so that A is popped first
            for orientation in Orientation::BOTH.into_iter().rev() {
                let mut mirrors = partial.mirrors.clone();
                mirrors.push(Mirror::new(turn.0, turn.1, orientation));
                search_stack.push(PartialPath {
                    next_factor: partial.next_factor + 1,
                    position: end,
                    direction: orientation.reflect(partial.direction),
                    mirrors,
                    trajectory: trajectory.clone(),
                });
            }
            continue;
        }

        let Some(exit) = Port::from_exit(end, grid_size) else {
            continue;
        };
        if owners.get(&exit).is_some_and(|&owner| owner != clue.number) {
            continue;
        }
        if !retraces(clue.port, grid_size, &partial.mirrors, &trajectory, exit) {
            tracing::trace!(clue = clue.number, ?factors, "path crosses its own mirror");
            continue;
        }

        candidates.push(Candidate {
            grid: Grid::from_path(grid_size, &trajectory, &partial.mirrors),
            mirrors: partial.mirrors,
        });
    }

    candidates
}

/// Whether a ray simulated through `mirrors` follows the realized path.
///
/// The realizer only places mirrors at turning points, so a path that later
/// runs over one of its own mirror cells would really be deflected there.
fn retraces(
    port: Port,
    grid_size: usize,
    mirrors: &[Mirror],
    trajectory: &[Cell],
    exit: Port,
) -> bool {
    let lookup = mirror_map(mirrors);
    let simulated = walk(port, grid_size, |cell| lookup.get(&cell).copied());
    simulated.exit == Some(exit) && simulated.cells == trajectory
}
