//! differ-cli
//!
//! Local stand-in for the invoking queue: wires the sqlite/filesystem
//! reference adapters plus the HTTP feature fetcher and a stdout-sink
//! publisher, and runs a single job end to end. The job comes from either
//! `--search-id`/`--snapshot-type`/`--worker-id` flags or a JSON envelope
//! `{searchId, snapshotType, workerId}` on stdin via `--stdin`.
//!
//! Never retries; retries are the queue's job. Exits non-zero on error,
//! using a distinct code for transient errors so a caller can tell "acked,
//! don't retry" apart from "failed, retry" without parsing output.

use std::io::Read as _;
use std::process::ExitCode;

use clap::Parser;
use rusqlite::Connection;

use wsn_core::errors::ErrorClass;
use wsn_core::logging_facility::{init, Profile};
use wsn_engine::{AppConfig, Differ, Job, Worker};
use wsn_store::{FsBlobStore, HttpFeatureFetcher, SqliteRepository};

mod publisher;
use publisher::StdoutPublisher;

#[derive(Debug, serde::Deserialize)]
struct StdinJob {
    #[serde(rename = "searchId")]
    search_id: String,
    #[serde(rename = "snapshotType")]
    snapshot_type: String,
    #[serde(rename = "workerId")]
    worker_id: String,
}

#[derive(Debug, Parser)]
#[command(name = "differ-cli")]
#[command(about = "Runs a single saved-search diff job end to end", long_about = None)]
struct Cli {
    #[arg(long)]
    search_id: Option<String>,

    #[arg(long)]
    snapshot_type: Option<String>,

    #[arg(long)]
    worker_id: Option<String>,

    /// Read the job envelope as JSON from stdin instead of flags.
    #[arg(long)]
    stdin: bool,
}

impl Cli {
    fn into_job(self) -> Result<Job, Box<dyn std::error::Error>> {
        if self.stdin {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            let job: StdinJob = serde_json::from_str(&buf)?;
            return Ok(Job {
                search_id: job.search_id,
                snapshot_type: job.snapshot_type,
                worker_id: job.worker_id,
            });
        }

        Ok(Job {
            search_id: self.search_id.ok_or("--search-id is required without --stdin")?,
            snapshot_type: self
                .snapshot_type
                .ok_or("--snapshot-type is required without --stdin")?,
            worker_id: self.worker_id.ok_or("--worker-id is required without --stdin")?,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init(Profile::Development);

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let job = cli.into_job()?;

    let config = AppConfig::load()?;

    let mut conn = Connection::open(&config.sqlite_path)?;
    wsn_store::migrations::apply_migrations(&mut conn)?;
    let repo = std::sync::Arc::new(SqliteRepository::new(conn));
    let blobs = std::sync::Arc::new(FsBlobStore::new(&config.cas_root));
    let fetcher = std::sync::Arc::new(HttpFeatureFetcher::new(config.feature_api_base_url.clone()));
    let publish = std::sync::Arc::new(StdoutPublisher);

    let differ = Differ::new(fetcher);
    let worker = Worker::new(repo, blobs, publish, differ, config.worker_config());

    match worker.process(job).await {
        Ok(()) => Ok(()),
        Err(e) if e.class() == ErrorClass::Transient => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}
