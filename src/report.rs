//! Text reports for solved puzzles.
//!
//! The puzzle's answer is built from the border ports without a clue: for
//! each side, sum the trace products of those ports, then multiply the four
//! sums together. Every figure saturates at `u64::MAX`, like trace products.

use std::collections::BTreeMap;

use crate::geometry::{Orientation, Port, Side};
use crate::grid::Grid;
use crate::puzzles::Puzzle;
use crate::solver::Solution;

/// Sum of the trace products of every non-clue port, per side.
pub fn side_sums(puzzle: &Puzzle, borders: &BTreeMap<Port, u64>) -> BTreeMap<Side, u64> {
    let mut sums: BTreeMap<Side, u64> = Side::ALL.into_iter().map(|side| (side, 0)).collect();
    for (&port, &product) in borders {
        if !puzzle.is_clue_port(port) {
            let sum = sums.entry(port.side).or_default();
            *sum = sum.saturating_add(product);
        }
    }
    sums
}

/// Product of the four side sums.
pub fn answer(puzzle: &Puzzle, borders: &BTreeMap<Port, u64>) -> u64 {
    side_sums(puzzle, borders)
        .values()
        .fold(1, |answer, &sum| answer.saturating_mul(sum))
}

/// Draws the mirrors with every border's trace product around them.
///
/// Top row first; `/` and `\` are mirrors A and B.
pub fn render(grid: &Grid, borders: &BTreeMap<Port, u64>) -> String {
    let size = grid.size();
    let value = |side: Side, index: usize| {
        borders
            .get(&Port::new(side, index))
            .map_or_else(|| "?".to_string(), u64::to_string)
    };
    let width = borders
        .values()
        .map(|product| product.to_string().len())
        .max()
        .unwrap_or(1);

    let edge = |side: Side| {
        let mut line = " ".repeat(width + 1);
        for col in 0..size {
            line.push_str(&format!("{:>width$} ", value(side, col)));
        }
        line.trim_end().to_string()
    };

    let mut output = String::new();
    output.push_str(&edge(Side::Top));
    output.push('\n');
    for row in (0..size).rev() {
        let mut line = format!("{:>width$} ", value(Side::Left, row));
        for col in 0..size {
            let symbol = grid.mirror_at((col, row)).map_or('.', Orientation::symbol);
            line.push_str(&format!("{symbol:>width$} "));
        }
        line.push_str(&value(Side::Right, row));
        output.push_str(&line);
        output.push('\n');
    }
    output.push_str(&edge(Side::Bottom));
    output.push('\n');
    output
}

/// Full report: board, mirrors per clue, side sums and the answer.
pub fn summary(puzzle: &Puzzle, solution: &Solution) -> String {
    let mut output = render(&solution.grid, &solution.borders);

    output.push_str("\nMirrors:\n");
    for (clue, mirrors) in puzzle.clues.iter().zip(&solution.mirrors) {
        let placed: Vec<String> = mirrors.iter().map(ToString::to_string).collect();
        output.push_str(&format!(
            "  clue {} ({}): [{}]\n",
            clue.number,
            clue.port,
            placed.join(", ")
        ));
    }

    output.push_str("\nNon-clue border sums:\n");
    let sums = side_sums(puzzle, &solution.borders);
    for (side, sum) in &sums {
        output.push_str(&format!("  {side}: {sum}\n"));
    }
    output.push_str(&format!("\nAnswer: {}\n", sums.values().product::<u64>()));
    output
}
