//! Layered backtracking search over clue candidates.
//!
//! Each clue gets a list of candidate layers (one per realizable mirror
//! placement of one of its factorizations). Clues with a single candidate are
//! merged into a baseline first, the baseline prunes every other list once,
//! and then a depth-first search picks one candidate per clue in clue order.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{MirrorError, Result};
use crate::factorization::Factorizer;
use crate::geometry::{Mirror, Port};
use crate::grid::Grid;
use crate::puzzles::Puzzle;
use crate::realizer::{realize, Candidate};
use crate::simulation::border_products;

/// Operational limits on the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Give up after this many search nodes. `None` searches exhaustively.
    pub node_budget: Option<u64>,
}

/// A consistent placement for every clue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Mirrors chosen for each clue, in the puzzle's clue order.
    pub mirrors: Vec<Vec<Mirror>>,
    /// All chosen layers merged.
    pub grid: Grid,
    /// Trace product of every border port on the merged grid.
    pub borders: BTreeMap<Port, u64>,
}

impl Solution {
    /// Every distinct mirror, in order of first appearance.
    pub fn all_mirrors(&self) -> Vec<Mirror> {
        let mut seen = Vec::new();
        for mirror in self.mirrors.iter().flatten() {
            if !seen.contains(mirror) {
                seen.push(*mirror);
            }
        }
        seen
    }
}

/// Candidate layers for every clue of `puzzle`, in clue order.
///
/// Candidates keep the order of their factorizations, and within one
/// factorization the order the realizer found them in.
pub fn candidate_layers(puzzle: &Puzzle) -> Result<Vec<Vec<Candidate>>> {
    puzzle.validate()?;
    let owners = puzzle.boundary_owners();
    let mut factorizer = Factorizer::new(puzzle.bounds);

    puzzle
        .clues
        .iter()
        .map(|clue| -> Result<Vec<Candidate>> {
            let factorizations = factorizer.enumerate(clue.number)?;
            let candidates: Vec<Candidate> = factorizations
                .iter()
                .flat_map(|factors| realize(factors, clue, puzzle.grid_size, &owners))
                .collect();
            debug!(
                clue = clue.number,
                port = %clue.port,
                factorizations = factorizations.len(),
                candidates = candidates.len(),
                "realized clue"
            );
            Ok(candidates)
        })
        .collect()
}

/// Merges the layers of every clue that has exactly one candidate.
pub fn baseline(grid_size: usize, layers: &[Vec<Candidate>]) -> Grid {
    layers
        .iter()
        .filter(|candidates| candidates.len() == 1)
        .fold(Grid::new(grid_size), |grid, candidates| {
            grid.merge(&candidates[0].grid)
        })
}

/// Drops every candidate that cannot sit on `baseline`.
pub fn prune(baseline: &Grid, layers: Vec<Vec<Candidate>>) -> Vec<Vec<Candidate>> {
    layers
        .into_iter()
        .map(|candidates| {
            candidates
                .into_iter()
                .filter(|candidate| baseline.compatible(&candidate.grid))
                .collect()
        })
        .collect()
}

/// A node of the backtracking search: the grid merged so far and the next
/// candidate to try for the clue at this depth.
struct SearchNode {
    grid: Grid,
    next_candidate: usize,
}

/// Picks one candidate per layer, depth-first and left to right.
///
/// Returns the chosen candidate index per layer and the merged grid.
pub(crate) fn search(
    baseline: Grid,
    layers: &[Vec<Candidate>],
    node_budget: Option<u64>,
) -> Result<Option<(Vec<usize>, Grid)>> {
    let mut search_stack = vec![SearchNode {
        grid: baseline,
        next_candidate: 0,
    }];
    // chosen[d] is the candidate that led from depth d to depth d + 1
    let mut chosen: Vec<usize> = Vec::with_capacity(layers.len());
    let mut nodes: u64 = 1;

    while let Some(node) = search_stack.last_mut() {
        let depth = chosen.len();
        if depth == layers.len() {
            debug!(nodes, "search complete");
            return Ok(Some((chosen, node.grid.clone())));
        }

        let candidates = &layers[depth];
        let mut descent = None;
        while node.next_candidate < candidates.len() {
            let index = node.next_candidate;
            node.next_candidate += 1;
            if node.grid.compatible(&candidates[index].grid) {
                descent = Some((index, node.grid.merge(&candidates[index].grid)));
                break;
            }
        }

        match descent {
            Some((index, grid)) => {
                nodes += 1;
                if node_budget.is_some_and(|budget| nodes > budget) {
                    return Err(MirrorError::SearchBudgetExhausted(nodes - 1));
                }
                chosen.push(index);
                search_stack.push(SearchNode {
                    grid,
                    next_candidate: 0,
                });
            }
            None => {
                // exhausted this clue: backtrack to the previous one
                search_stack.pop();
                chosen.pop();
            }
        }
    }

    debug!(nodes, "search exhausted");
    Ok(None)
}

/// Solves `puzzle`, returning the first consistent placement found.
///
/// `Ok(None)` means the puzzle has no solution within its factorization
/// bounds; errors are reserved for invalid definitions and the node budget.
pub fn solve(puzzle: &Puzzle, config: &SolverConfig) -> Result<Option<Solution>> {
    let layers = candidate_layers(puzzle)?;
    let total: usize = layers.iter().map(Vec::len).sum();
    info!(
        puzzle = %puzzle.name,
        clues = layers.len(),
        candidates = total,
        "generated candidate layers"
    );

    let base = baseline(puzzle.grid_size, &layers);
    let forced = layers.iter().filter(|layer| layer.len() == 1).count();
    let layers = prune(&base, layers);
    let remaining: usize = layers.iter().map(Vec::len).sum();
    info!(forced, remaining, "pruned against baseline");

    if let Some((clue, _)) = puzzle
        .clues
        .iter()
        .zip(&layers)
        .find(|(_, candidates)| candidates.is_empty())
    {
        warn!(clue = clue.number, port = %clue.port, "clue has no candidates left");
        return Ok(None);
    }

    let Some((chosen, grid)) = search(base, &layers, config.node_budget)? else {
        info!(puzzle = %puzzle.name, "no solution");
        return Ok(None);
    };

    let mirrors = chosen
        .iter()
        .zip(&layers)
        .map(|(&index, candidates)| candidates[index].mirrors.clone())
        .collect();
    let borders = border_products(&grid);
    info!(puzzle = %puzzle.name, "solution found");

    Ok(Some(Solution {
        mirrors,
        grid,
        borders,
    }))
}
