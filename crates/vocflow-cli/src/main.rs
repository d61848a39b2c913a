mod args;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;
use vocflow_classify::{
    BatchOptions, HttpTransport, classify_batch, classify_consultation, latest_classification,
    service_status,
};
use vocflow_core::{StoredConsultation, Transcript, extract_and_validate_identity};

use crate::args::ServiceArgs;

#[derive(Parser)]
#[command(name = "vocflow", version, about = "Consultation classification client")]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and validate the client identity from consultation text.
    Identity {
        /// Consultation text. Read from --file or stdin when omitted.
        text: Option<String>,

        /// Read the consultation text from a file.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Reference year for age calculation (defaults to the current year).
        #[arg(long)]
        year: Option<i32>,
    },

    /// Assemble a transcript and classify it.
    Classify {
        /// Transcript JSON file.
        #[arg(long)]
        transcript: PathBuf,
    },

    /// Report whether the classification service is reachable.
    Status,

    /// Classify stored consultations sequentially.
    Batch {
        /// JSON array of stored consultations.
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value = "10")]
        limit: usize,

        #[arg(long, default_value = "0")]
        offset: usize,

        #[arg(long, default_value = "100")]
        max_records: usize,

        /// Pause between consecutive requests.
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },

    /// Show the latest stored classification for a source id.
    History {
        source_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.service.to_config();
    tracing::debug!(?config, "vocflow v{}", env!("CARGO_PKG_VERSION"));
    let transport = HttpTransport::new();

    match cli.command {
        Commands::Identity { text, file, year } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_text(&path)?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading consultation text from stdin")?;
                    buf
                }
            };
            let year = year.unwrap_or_else(|| Utc::now().year());
            print_json(&extract_and_validate_identity(&text, year))?;
        }

        Commands::Classify { transcript } => {
            let transcript: Transcript = read_json(&transcript)?;
            let consultation = transcript
                .assemble(Utc::now())
                .context("assembling transcript")?;
            let result = classify_consultation(
                &transport,
                &consultation.content,
                &consultation.metadata,
                &config,
            )
            .await;
            print_json(&result)?;
        }

        Commands::Status => {
            print_json(&service_status(&transport, &config).await)?;
        }

        Commands::Batch {
            input,
            limit,
            offset,
            max_records,
            delay_ms,
        } => {
            let records: Vec<StoredConsultation> = read_json(&input)?;
            let options = BatchOptions {
                limit,
                offset,
                max_records,
                delay: Duration::from_millis(delay_ms),
            };
            print_json(&classify_batch(&transport, &records, &options, &config).await)?;
        }

        Commands::History { source_id } => {
            print_json(&latest_classification(&transport, &source_id, &config).await)?;
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{out}");
    Ok(())
}
