//! Kifu-Gen: Go training-data generation engine.
//!
//! ## Usage
//!
//! - `kifu-gen replay <file>` - Replay a game record move by move
//! - `kifu-gen stats <dir>` - Aggregate statistics over a record corpus

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use kifu_gen::sgf::{self, GameRecord, LoadError};

/// Kifu-Gen: training-data generation for Go neural networks
#[derive(Parser)]
#[command(name = "kifu-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a game record move by move, printing positions
    Replay {
        /// Path to the SGF file
        file: PathBuf,
        /// Print the board every N moves (0 prints only the final position)
        #[arg(long, default_value_t = 1)]
        show_every: usize,
    },
    /// Aggregate statistics over a directory of game records
    Stats {
        /// Directory scanned recursively for .sgf files
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Replay { file, show_every } => run_replay(&file, show_every),
        Commands::Stats { dir } => run_stats(&dir),
    }
}

fn run_replay(file: &Path, show_every: usize) -> Result<()> {
    let game =
        sgf::load_game_file(file).with_context(|| format!("loading {}", file.display()))?;
    let mut board = game.board;
    sgf::replay(&mut board, &game.moves, |index, board| {
        if show_every > 0 && (index + 1) % show_every == 0 {
            println!("Move no. {}:", index + 1);
            println!("{board}");
        }
    })
    .with_context(|| format!("replaying {}", file.display()))?;
    if show_every == 0 {
        println!("{board}");
    }
    println!("Result: {}", game.record.result);
    Ok(())
}

/// Parses every record in the corpus (one rayon task per file; records are
/// independent, so this parallelizes without shared state) and prints
/// aggregate counts. Individual bad files are reported and skipped.
fn run_stats(dir: &Path) -> Result<()> {
    let mut files = Vec::new();
    collect_sgf_files(dir, &mut files)
        .with_context(|| format!("scanning {}", dir.display()))?;
    println!("Scanning {} records under {}", files.len(), dir.display());

    let parsed: Vec<(PathBuf, Result<GameRecord, LoadError>)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = fs::read_to_string(&path)
                .map_err(|source| LoadError::Io {
                    path: path.display().to_string(),
                    source,
                })
                .and_then(|text| GameRecord::parse(&text));
            (path, outcome)
        })
        .collect();

    let mut total = 0usize;
    let mut unreadable = 0usize;
    let mut valid = 0usize;
    let mut total_moves = 0usize;
    let mut faults: BTreeMap<String, usize> = BTreeMap::new();
    let mut sizes: BTreeMap<String, usize> = BTreeMap::new();
    let mut rules: BTreeMap<String, usize> = BTreeMap::new();

    for (path, outcome) in parsed {
        total += 1;
        match outcome {
            Err(err) => {
                unreadable += 1;
                eprintln!("skipping {}: {err}", path.display());
            }
            Ok(record) => {
                *sizes
                    .entry(format!("{}x{}", record.width, record.height))
                    .or_default() += 1;
                if !record.rules_text.is_empty() {
                    *rules.entry(record.rules_text.clone()).or_default() += 1;
                }
                match record.fault {
                    None => {
                        valid += 1;
                        total_moves += record.moves.len();
                    }
                    Some(fault) => {
                        *faults.entry(fault.to_string()).or_default() += 1;
                    }
                }
            }
        }
    }

    println!();
    println!("Record Statistics");
    println!("=================");
    println!("Total records: {total}");
    println!("Valid:         {valid}");
    println!("Unreadable:    {unreadable}");
    if valid > 0 {
        println!(
            "Mean game length (valid records): {:.1}",
            total_moves as f64 / valid as f64
        );
    }
    print_histogram("Invalid records by fault", &faults);
    print_histogram("Board sizes", &sizes);
    print_histogram("Rule strings", &rules);
    Ok(())
}

fn print_histogram(title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for (key, count) in counts {
        println!("  {key}: {count}");
    }
}

fn collect_sgf_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sgf_files(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sgf"))
        {
            out.push(path);
        }
    }
    Ok(())
}
