//! Rebuilds a saved match and prints where it ended up.
//!
//! ```bash
//! skirmish-replay <snapshot.json> <turns.log>
//! skirmish-replay            # latest snapshot + log under the data directory
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use skirmish_runtime::repository::{FileSnapshotStore, FileTurnLog};
use skirmish_runtime::{RuntimeConfig, default_data_dir, replay};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let game = match args.as_slice() {
        [snapshot_path, log_path] => {
            let snapshot = FileSnapshotStore::read_file(snapshot_path)
                .with_context(|| format!("reading snapshot {snapshot_path}"))?;
            let records = FileTurnLog::read_file(log_path)
                .with_context(|| format!("reading turn log {log_path}"))?;
            replay::rebuild(snapshot, &records)?
        }
        [] => {
            let dir: PathBuf = RuntimeConfig::from_env()
                .data_dir
                .unwrap_or_else(default_data_dir);
            replay::restore_saved(&dir)
                .with_context(|| format!("restoring match from {}", dir.display()))?
        }
        _ => bail!("usage: skirmish-replay [<snapshot.json> <turns.log>]"),
    };

    println!("turn: {}", game.turn());
    println!("state root: {}", hex::encode(game.state_root()));
    if let Some(winner) = game.winner() {
        println!("winner: team {winner}");
    }

    Ok(())
}
