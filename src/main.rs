mod aggregate;
mod column;
mod error;
mod extract;
mod pipeline;
mod publish;
mod settings;
mod summarize;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use extract::WorkbookSource;
use pipeline::{Pipeline, RunOptions, RunRequest};
use publish::DocxPublisher;
use summarize::{ChatClient, ChatConfig};

#[derive(Parser)]
#[command(
    name = "sheet_summarizer",
    about = "Summarize one spreadsheet column into a Word document"
)]
struct Cli {
    /// Spreadsheet to read (prompted for when omitted)
    #[arg(short, long)]
    file: Option<String>,
    /// Column letter, e.g. E (prompted for when omitted)
    #[arg(short, long)]
    column: Option<String>,
    /// Line placed before the column values in the request
    #[arg(long)]
    context: Option<String>,
    /// Output document path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Print `label` and read one line from stdin. `None` on EOF or a blank line.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = settings::load()?;
    if let Some(output) = cli.output {
        settings.output_path = output;
    }
    info!(settings = ?settings, "Starting sheet summarizer");
    if settings.api_key.is_none() {
        warn!("SUMMARIZER_API_KEY is not set; the fallback summary will be used");
    }

    let file = match cli.file {
        Some(f) => Some(f),
        None => prompt("Give me the file path - ")?,
    };
    // The column is only asked for once there is a file to read it from.
    let column = match (&file, cli.column) {
        (None, _) => None,
        (Some(_), Some(c)) => Some(c),
        (Some(_), None) => prompt("Enter the column letter to read data from (e.g., E): ")?,
    };
    let request = RunRequest {
        file,
        column,
        context: cli.context.or_else(|| settings.context.clone()),
    };

    let client = ChatClient::new(ChatConfig::from_settings(&settings))?;
    let options = RunOptions::from_settings(&settings);
    let pipeline = Pipeline::new(&WorkbookSource, &client, &DocxPublisher, &options);

    match pipeline.run(request) {
        Ok(outcome) => {
            println!("{}", outcome.message());
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            println!("{}. Exiting.", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
