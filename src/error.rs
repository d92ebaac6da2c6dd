//! Error type shared by the solver, the simulator and the file formats.
//!
//! Structural infeasibility (a path that cannot be realized, a puzzle with no
//! solution) is never an error. Errors are reserved for caller mistakes and
//! for I/O.

use thiserror::Error;

use crate::geometry::Port;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("unknown side `{0}` (expected top, bottom, left or right)")]
    UnknownSide(String),

    #[error("grid size must be positive")]
    EmptyGrid,

    #[error("index {index} is outside a border of length {grid_size}")]
    IndexOutOfRange { index: usize, grid_size: usize },

    #[error("clue numbers must be positive")]
    ZeroClue,

    #[error("two clues share the border position {0}")]
    DuplicatePort(Port),

    #[error("grid is {actual}x{actual}, expected {expected}x{expected}")]
    GridSizeMismatch { expected: usize, actual: usize },

    #[error("search stopped after visiting {0} nodes")]
    SearchBudgetExhausted(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
