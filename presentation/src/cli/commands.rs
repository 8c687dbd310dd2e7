//! CLI command definitions

use annotation_domain::{FormKind, Role, TaskId, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable output
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for annotation_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => annotation_domain::OutputFormat::Text,
            OutputFormat::Json => annotation_domain::OutputFormat::Json,
        }
    }
}

/// Kind of task 3 form
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormKindArg {
    /// Question fields only
    #[value(name = "question_only")]
    QuestionOnly,
    /// Question and answer fields
    #[value(name = "question_answer")]
    QuestionAnswer,
}

impl From<FormKindArg> for FormKind {
    fn from(kind: FormKindArg) -> Self {
        match kind {
            FormKindArg::QuestionOnly => FormKind::QuestionOnly,
            FormKindArg::QuestionAnswer => FormKind::QuestionAnswer,
        }
    }
}

/// CLI arguments for annotation-quorum
#[derive(Parser, Debug)]
#[command(name = "annotation-quorum")]
#[command(author, version, about = "Multi-annotator discussion labelling with quorum-gated consensus")]
#[command(long_about = r#"
Annotation Quorum collects independent annotations for three sequential
tasks per discussion and aggregates them into a consensus once each task
reaches its annotator quota (3 for tasks 1 and 2, 5 for task 3).

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./annotation.toml   Project-level config
3. ~/.config/annotation-quorum/config.toml   Global config

Example:
  annotation-quorum import batch.json
  annotation-quorum --user alice submit d-42 task1 --data '{"relevance": "Yes"}'
  annotation-quorum --role pod_lead status d-42 task1 ready_for_next
  annotation-quorum --user alice form duplicate d-42 1 --kind question_only
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// JSON snapshot file holding discussions, annotations and consensus
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Act as this user
    #[arg(long, value_name = "USER", global = true)]
    pub user: Option<String>,

    /// Act with this role (annotator, pod_lead, admin)
    #[arg(long, value_name = "ROLE", global = true)]
    pub role: Option<Role>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators and lifecycle notices
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import discussions from a JSON array
    Import {
        /// File containing the discussions
        file: PathBuf,
    },

    /// List discussions
    List(ListArgs),

    /// Show one discussion with its tasks, annotators and consensus
    Show {
        discussion: String,
    },

    /// Submit or replace your annotation for a task
    Submit {
        discussion: String,
        task: TaskId,
        #[command(flatten)]
        data: DataArgs,
    },

    /// Set a task's status (pod leads and admins)
    Status {
        discussion: String,
        task: TaskId,
        status: TaskStatus,
    },

    /// Inspect, compute or save the consensus of a task
    #[command(subcommand)]
    Consensus(ConsensusCommand),

    /// Add or duplicate a task 3 form and print the resulting data
    #[command(subcommand)]
    Form(FormCommand),

    /// Show configuration file locations and the effective configuration
    Config,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Task the --status filter applies to
    #[arg(long, requires = "status")]
    pub task: Option<TaskId>,

    /// Only discussions whose --task is in this status
    #[arg(long, requires = "task")]
    pub status: Option<TaskStatus>,

    /// Case-insensitive search in title and repository
    #[arg(long)]
    pub search: Option<String>,

    /// Created at or after (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<DateTime<Utc>>,

    /// Created at or before (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<DateTime<Utc>>,

    /// Repository language
    #[arg(long)]
    pub language: Option<String>,

    /// Import batch
    #[arg(long)]
    pub batch: Option<String>,
}

/// Annotation data given inline or as a file
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct DataArgs {
    /// JSON object of field answers
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// File containing the JSON object
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConsensusCommand {
    /// Show the stored consensus record
    Show { discussion: String, task: TaskId },

    /// Aggregate the current annotations without saving
    Compute { discussion: String, task: TaskId },

    /// Save a reviewer consensus (pod leads and admins)
    Save {
        discussion: String,
        task: TaskId,
        #[command(flatten)]
        data: DataArgs,

        /// Overall star rating (1-5)
        #[arg(long)]
        stars: Option<u8>,

        /// Overall comment
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FormCommand {
    /// Append a blank form
    Add {
        discussion: String,
        #[arg(long, value_enum, default_value = "question_answer")]
        kind: FormKindArg,
        #[command(flatten)]
        base: BaseDataArgs,
    },

    /// Copy an existing form into a new one
    Duplicate {
        discussion: String,
        /// Number of the form to copy
        source: u32,
        #[arg(long, value_enum, default_value = "question_answer")]
        kind: FormKindArg,
        #[command(flatten)]
        base: BaseDataArgs,
    },
}

/// Task 3 data to edit instead of your stored annotation
#[derive(Args, Debug, Default)]
#[group(required = false, multiple = false)]
pub struct BaseDataArgs {
    /// JSON object of field answers
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// File containing the JSON object
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Accept a plain date (midnight UTC) or a full RFC 3339 timestamp
fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD or RFC 3339)", s))
}
