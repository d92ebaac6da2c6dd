//! Hall of Mirrors Solver Library
//!
//! Places mirrors in a square grid so that a ray entering at each numbered
//! border clue travels segments whose lengths multiply to that clue's number,
//! with no two mirrors on neighbouring cells.
//!
//! The pipeline runs bottom-up: `factorization` lists the segment-length
//! tuples for each number, `realizer` turns a tuple into mirror placements,
//! and `solver` stacks one placement per clue. `simulation` traces rays over
//! a finished configuration.

pub mod error;
pub mod factorization;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod puzzles;
pub mod realizer;
pub mod report;
pub mod simulation;
pub mod solver;

pub use error::{MirrorError, Result};
pub use factorization::{enumerate_factorizations, FactorBounds, Factorization};
pub use geometry::{Cell, Mirror, Orientation, Port, Side};
pub use grid::{CellState, Grid};
pub use puzzles::{Clue, Puzzle};
pub use simulation::{trace_cells, trace_product};
pub use solver::{solve, Solution, SolverConfig};
