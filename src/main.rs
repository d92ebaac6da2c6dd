//! Hall of Mirrors Solver
//!
//! Solves mirror puzzles on a square grid: each numbered border clue must be
//! the product of the segment lengths of the ray entering there. Ships the
//! 5x5 and 10x10 reference puzzles and reads other puzzles from JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mirrors::{enumerate_factorizations, persistence, puzzles, report, simulation};
use mirrors::{Port, Puzzle, Side, SolverConfig};

/// Solves Hall of Mirrors puzzles.
#[derive(Parser)]
#[command(name = "mirrors")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and print the board, mirrors and answer.
    Solve {
        #[command(flatten)]
        source: PuzzleSource,
        /// Give up after this many search nodes.
        #[arg(long)]
        node_budget: Option<u64>,
        /// Directory to save the solution into.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print a previously saved solution.
    Show {
        /// Directory given to `solve --save`.
        dir: PathBuf,
    },
    /// List the segment-length factorizations of some numbers.
    Factorize {
        #[arg(required = true)]
        numbers: Vec<u64>,
        #[arg(long, default_value_t = 6)]
        max_len: usize,
        #[arg(long, default_value_t = 10)]
        max_factor: u64,
    },
    /// Solve a puzzle, then trace the ray entering at one border port.
    Trace {
        #[command(flatten)]
        source: PuzzleSource,
        /// Side of the entry port: top, bottom, left or right.
        #[arg(long)]
        side: String,
        #[arg(long)]
        index: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Builtin {
    /// 5x5 reference puzzle.
    Small,
    /// 10x10 reference puzzle.
    Large,
}

#[derive(Args)]
struct PuzzleSource {
    /// Built-in puzzle to solve.
    #[arg(long, value_enum, default_value = "small", conflicts_with = "file")]
    puzzle: Builtin,
    /// JSON puzzle definition.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Override the puzzle's maximum factorization length.
    #[arg(long)]
    max_len: Option<usize>,
    /// Override the puzzle's maximum segment length.
    #[arg(long)]
    max_factor: Option<u64>,
}

impl PuzzleSource {
    fn load(&self) -> Result<Puzzle> {
        let mut puzzle = match &self.file {
            Some(path) => Puzzle::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => match self.puzzle {
                Builtin::Small => puzzles::small(),
                Builtin::Large => puzzles::large(),
            },
        };
        if let Some(max_len) = self.max_len {
            puzzle.bounds.max_len = max_len;
        }
        if let Some(max_factor) = self.max_factor {
            puzzle.bounds.max_factor = max_factor;
        }
        Ok(puzzle)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            source,
            node_budget,
            save,
        } => run_solve(&source.load()?, node_budget, save),
        Command::Show { dir } => run_show(dir),
        Command::Factorize {
            numbers,
            max_len,
            max_factor,
        } => run_factorize(&numbers, max_len, max_factor),
        Command::Trace {
            source,
            side,
            index,
        } => run_trace(&source.load()?, &side, index),
    }
}

/// Solves, prints the report and optionally saves it.
fn run_solve(puzzle: &Puzzle, node_budget: Option<u64>, save: Option<PathBuf>) -> Result<()> {
    println!(
        "Solving {} ({}x{}, {} clues)...",
        puzzle.name,
        puzzle.grid_size,
        puzzle.grid_size,
        puzzle.clues.len()
    );
    let config = SolverConfig { node_budget };
    let Some(solution) = mirrors::solve(puzzle, &config)? else {
        println!("No solution found!");
        return Ok(());
    };

    println!();
    print!("{}", report::summary(puzzle, &solution));

    if let Some(dir) = save {
        persistence::save(&dir, puzzle, &solution)
            .with_context(|| format!("saving to {}", dir.display()))?;
        println!("\nWrote {}", dir.display());
    }
    Ok(())
}

/// Loads and prints a saved solution.
fn run_show(dir: PathBuf) -> Result<()> {
    let (puzzle, solution) = persistence::load(&dir).with_context(|| {
        format!(
            "no saved solution in {}; run `mirrors solve --save` first",
            dir.display()
        )
    })?;
    println!("Puzzle {} ({}x{}):", puzzle.name, puzzle.grid_size, puzzle.grid_size);
    print!("{}", report::summary(&puzzle, &solution));
    Ok(())
}

fn run_factorize(numbers: &[u64], max_len: usize, max_factor: u64) -> Result<()> {
    let sets = enumerate_factorizations(numbers, max_len, max_factor)?;
    for (number, set) in numbers.iter().zip(&sets) {
        println!("{number}: {} factorizations", set.len());
        for factors in set {
            let shown: Vec<String> = factors.iter().map(u64::to_string).collect();
            println!("  ({})", shown.join(", "));
        }
    }
    Ok(())
}

/// Prints the cells and product of one port's ray on the solved grid.
fn run_trace(puzzle: &Puzzle, side: &str, index: usize) -> Result<()> {
    let side: Side = side.parse()?;
    Port::new(side, index).validate(puzzle.grid_size)?;

    let Some(solution) = mirrors::solve(puzzle, &SolverConfig::default())? else {
        bail!("{} has no solution to trace", puzzle.name);
    };
    let all_mirrors = solution.all_mirrors();
    let cells = simulation::trace_cells(side, index, &all_mirrors, puzzle.grid_size)?;
    let product = simulation::trace_product(&solution.grid, side, index)?;

    let path: Vec<String> = cells
        .iter()
        .map(|(col, row)| format!("({col}, {row})"))
        .collect();
    println!("{side} {index}: {}", path.join(" -> "));
    println!("product: {product}");
    Ok(())
}
