//! Saving and loading solved puzzles.
//!
//! A save directory holds two files:
//! - `solution.json`: the puzzle definition, the mirrors per clue, the merged
//!   grid and every border product, for reloading;
//! - `solution.txt`: the human-readable report from `report::summary`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, Result};
use crate::geometry::{Mirror, Port};
use crate::grid::Grid;
use crate::puzzles::Puzzle;
use crate::report::summary;
use crate::solver::Solution;

const SOLUTION_JSON: &str = "solution.json";
const SOLUTION_TXT: &str = "solution.txt";

/// One border reading; JSON maps need string keys, so borders are a list.
#[derive(Serialize, Deserialize)]
struct BorderReading {
    #[serde(flatten)]
    port: Port,
    product: u64,
}

#[derive(Serialize, Deserialize)]
struct SavedSolution {
    puzzle: Puzzle,
    mirrors: Vec<Vec<Mirror>>,
    grid: Grid,
    borders: Vec<BorderReading>,
}

/// Writes both files into `dir`, creating it if needed.
pub fn save(dir: impl AsRef<Path>, puzzle: &Puzzle, solution: &Solution) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    save_text(&dir.join(SOLUTION_TXT), puzzle, solution)?;
    save_json(&dir.join(SOLUTION_JSON), puzzle, solution)?;
    Ok(())
}

fn save_text(path: &Path, puzzle: &Puzzle, solution: &Solution) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(
        file,
        "Puzzle {} ({}x{}):",
        puzzle.name, puzzle.grid_size, puzzle.grid_size
    )?;
    write!(file, "{}", summary(puzzle, solution))?;
    Ok(())
}

fn save_json(path: &Path, puzzle: &Puzzle, solution: &Solution) -> Result<()> {
    let saved = SavedSolution {
        puzzle: puzzle.clone(),
        mirrors: solution.mirrors.clone(),
        grid: solution.grid.clone(),
        borders: solution
            .borders
            .iter()
            .map(|(&port, &product)| BorderReading { port, product })
            .collect(),
    };
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &saved)?;
    writer.flush()?;
    Ok(())
}

/// Loads the puzzle and solution saved in `dir`.
pub fn load(dir: impl AsRef<Path>) -> Result<(Puzzle, Solution)> {
    let file = File::open(dir.as_ref().join(SOLUTION_JSON))?;
    let saved: SavedSolution = serde_json::from_reader(BufReader::new(file))?;
    saved.puzzle.validate()?;
    if saved.grid.size() != saved.puzzle.grid_size {
        return Err(MirrorError::GridSizeMismatch {
            expected: saved.puzzle.grid_size,
            actual: saved.grid.size(),
        });
    }

    let solution = Solution {
        mirrors: saved.mirrors,
        grid: saved.grid,
        borders: saved
            .borders
            .into_iter()
            .map(|reading| (reading.port, reading.product))
            .collect(),
    };
    Ok((saved.puzzle, solution))
}
