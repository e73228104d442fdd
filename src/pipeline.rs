use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::extract::{ColumnExtractor, SheetSource};
use crate::publish::Publisher;
use crate::settings::Settings;
use crate::summarize::Summarizer;

/// Where a run currently is. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingFile,
    AwaitingColumn,
    Extracting,
    Summarizing,
    Publishing,
    Done,
}

/// Operator input for one run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub file: Option<String>,
    pub column: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub system_instruction: Option<String>,
    pub fallback_summary: String,
    pub output_path: PathBuf,
}

impl RunOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        RunOptions {
            system_instruction: settings.system_instruction.clone(),
            fallback_summary: settings.fallback_summary.clone(),
            output_path: settings.output_path.clone(),
        }
    }
}

/// How a run ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Published {
        path: PathBuf,
        rows: usize,
        fallback: bool,
    },
    MissingFile,
    MissingColumn,
    NoData,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Published { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Published { path, fallback: false, .. } => {
                format!("Summary created successfully in {}", path.display())
            }
            Outcome::Published { path, rows, fallback: true } => format!(
                "Summary created successfully in {} ({} rows read, summarization unavailable, fallback text used)",
                path.display(),
                rows
            ),
            Outcome::MissingFile => "No file selected. Exiting.".to_string(),
            Outcome::MissingColumn => "Invalid column letter. Exiting.".to_string(),
            Outcome::NoData => "No data found in the specified column. Exiting.".to_string(),
        }
    }
}

/// Extract -> aggregate -> summarize -> publish, once.
pub struct Pipeline<'a, S, C, P> {
    sheets: &'a S,
    summarizer: &'a C,
    publisher: &'a P,
    options: &'a RunOptions,
    stage: Stage,
}

impl<'a, S, C, P> Pipeline<'a, S, C, P>
where
    S: SheetSource,
    C: Summarizer,
    P: Publisher,
{
    pub fn new(sheets: &'a S, summarizer: &'a C, publisher: &'a P, options: &'a RunOptions) -> Self {
        Pipeline {
            sheets,
            summarizer,
            publisher,
            options,
            stage: Stage::AwaitingFile,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "Stage transition");
        self.stage = next;
    }

    pub fn run(mut self, request: RunRequest) -> Result<Outcome, PipelineError> {
        let Some(file) = non_blank(request.file) else {
            return Ok(Outcome::MissingFile);
        };
        self.advance(Stage::AwaitingColumn);

        let Some(column) = non_blank(request.column) else {
            return Ok(Outcome::MissingColumn);
        };
        let column = column.to_ascii_uppercase();
        self.advance(Stage::Extracting);

        let aggregate = ColumnExtractor::new(self.sheets).extract(
            Path::new(&file),
            &column,
            request.context.as_deref(),
        )?;
        if !aggregate.has_rows() {
            return Ok(Outcome::NoData);
        }
        self.advance(Stage::Summarizing);

        let (summary, fallback) = match self
            .summarizer
            .summarize(aggregate.as_str(), self.options.system_instruction.as_deref())
        {
            Some(summary) => (summary, false),
            None => {
                warn!("Using fallback summary");
                (self.options.fallback_summary.clone(), true)
            }
        };
        self.advance(Stage::Publishing);

        self.publisher.publish(&self.options.output_path, &summary)?;
        self.advance(Stage::Done);

        info!(stage = ?self.stage(), rows = aggregate.row_count(), fallback, "Run complete");
        Ok(Outcome::Published {
            path: self.options.output_path.clone(),
            rows: aggregate.row_count(),
            fallback,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
