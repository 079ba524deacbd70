use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ytcap_core::platforms::youtube::{YouTubeCaptions, YouTubeOembed};
use ytcap_core::{fs_paths, BatchObserver, HistoryStore, ItemOutcome, Pipeline};

#[derive(Parser)]
#[command(name = "ytcap", about = "Batch YouTube caption downloader", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch captions for a newline-delimited list of video URLs
    Fetch {
        /// File with one URL per line; reads stdin when omitted
        input: Option<PathBuf>,

        /// Directory the caption text files are written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// History file tracking already-processed videos
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Print the cumulative download history
    History {
        /// History file to read
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

struct ConsoleObserver;

impl BatchObserver for ConsoleObserver {
    fn on_item_complete(&self, completed: usize, total: usize, url: &str, outcome: &ItemOutcome) {
        let label = match outcome {
            ItemOutcome::Saved { filename, .. } => format!("saved {filename}"),
            ItemOutcome::Skipped { .. } => "skipped (already processed)".to_string(),
            ItemOutcome::Failed { error } => format!("failed: {error}"),
        };
        println!("[{completed}/{total}] {url}: {label}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch {
            input,
            output,
            history,
        } => fetch(input, output, history).await,
        Command::History { history } => show_history(history),
    }
}

async fn fetch(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    history: Option<PathBuf>,
) -> anyhow::Result<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let save_dir = output.unwrap_or_else(fs_paths::default_save_dir);
    std::fs::create_dir_all(&save_dir)
        .with_context(|| format!("creating {}", save_dir.display()))?;
    let mut store = HistoryStore::load(history.unwrap_or_else(fs_paths::default_history_path));

    let pipeline = Pipeline::new(
        Arc::new(YouTubeOembed::new()),
        Arc::new(YouTubeCaptions::new()),
    );
    let report = pipeline
        .run_batch(&text, &mut store, &save_dir, &ConsoleObserver)
        .await?;

    println!();
    if report.is_clean() {
        println!("No errors occurred during the last download.");
    } else {
        for line in &report.errors {
            println!("{line}");
        }
    }
    println!("Processed {} URL(s).", report.processed);
    Ok(())
}

fn show_history(history: Option<PathBuf>) -> anyhow::Result<()> {
    let store = HistoryStore::load(history.unwrap_or_else(fs_paths::default_history_path));
    if store.is_empty() {
        println!("No downloads recorded yet.");
        return Ok(());
    }
    for (_, record) in store.iter() {
        println!("Title: {}", record.title);
        println!("URL: {}", record.url);
        println!("Filename: {}", record.filename);
        println!();
    }
    Ok(())
}
