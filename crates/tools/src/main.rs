use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use warren_core::{InputJournal, ReplayResult, replay::replay_to_end};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: String,

    /// Number of simulation ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let journal_data = fs::read_to_string(&args.journal)
        .with_context(|| format!("Failed to read journal file: {}", args.journal))?;
    let journal: InputJournal = serde_json::from_str(&journal_data)
        .with_context(|| "Failed to deserialize journal JSON")?;

    let result: ReplayResult = replay_to_end(&journal, args.ticks)
        .map_err(|e| anyhow::anyhow!("Replay failed during execution: {:?}", e))?;

    println!("Replay complete.");
    println!("Final Tick: {}", result.final_tick);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);

    Ok(())
}
