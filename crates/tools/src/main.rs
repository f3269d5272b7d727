//! Headless replay of a recorded session journal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delve_core::journal_file::load_journal;
use delve_core::replay_to_end;

#[derive(Parser)]
#[command(author, version, about = "Replay a recorded dungeon session", long_about = None)]
struct Args {
    /// Path to the JSONL journal written by the game
    #[arg(short, long)]
    journal: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let journal = load_journal(&args.journal)
        .with_context(|| format!("load journal {}", args.journal.display()))?;

    let result = replay_to_end(&journal)
        .map_err(|err| anyhow::anyhow!("replay failed during setup: {err:?}"))?;

    println!("Replay complete.");
    println!("Seed: {}", journal.seed);
    println!("Inputs: {}", journal.inputs.len());
    println!("Final turn: {}", result.final_turn);
    match result.outcome {
        Some(outcome) => println!("Outcome: {outcome:?}"),
        None => println!("Outcome: session still in progress"),
    }
    println!("Snapshot hash: {:#018x}", result.snapshot_hash);
    Ok(())
}
