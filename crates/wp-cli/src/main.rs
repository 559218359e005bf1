//! WindowPro scripted front end.
//!
//! Reads one intent per line from stdin and applies it to the scene engine,
//! standing in for the visualizer's toolbar and canvas. With `--store` the
//! design is saved under the given directory and restored on the next run.

mod script;
mod session;

use anyhow::Context as _;
use clap::Parser;
use std::io::{self, BufRead};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use wp_editor::{DEFAULT_KEY, EngineConfig, FileStore, KeyValueStore, MemoryStore, SceneEngine};

#[derive(Parser, Debug)]
#[command(name = "wp-cli", version, about = "Compose window overlays with undo/redo")]
struct Cli {
    /// Directory the design is saved in. Without it the session is in-memory.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Key the design is saved under.
    #[arg(long, default_value = DEFAULT_KEY)]
    key: String,

    /// Cap the undo history at this many steps (default: unbounded). Must be
    /// at least 1.
    #[arg(long)]
    history_limit: Option<NonZeroUsize>,

    /// Print the final scene as JSON when input ends.
    #[arg(long)]
    show: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = EngineConfig::default()
        .with_storage_key(cli.key.clone())
        .with_history_limit(cli.history_limit);
    let stdin = io::stdin();

    match &cli.store {
        Some(dir) => {
            let store = FileStore::open(dir)
                .with_context(|| format!("opening store at {}", dir.display()))?;
            drive(SceneEngine::init(store, config), stdin.lock(), cli.show)
        }
        None => drive(
            SceneEngine::init(MemoryStore::new(), config),
            stdin.lock(),
            cli.show,
        ),
    }
}

fn drive<S: KeyValueStore>(
    mut engine: SceneEngine<S>,
    input: impl BufRead,
    show: bool,
) -> anyhow::Result<()> {
    log::debug!("session started with {} element(s)", engine.current().len());
    session::run(&mut engine, input, io::stdout().lock(), io::stderr().lock())
        .context("reading intents")?;
    if show {
        println!("{}", session::render_json(&engine));
    }
    engine.teardown();
    Ok(())
}
