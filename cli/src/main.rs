//! CLI entrypoint for Annotation Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use annotation_application::{
    AuditLogger, ComputeConsensusUseCase, EditFormsUseCase, FormEdit, FormEditInput,
    IdentityProvider, ImportDiscussionsUseCase, LifecycleNotifier, NoAuditLogger, NoLifecycleNotifier, QueryDiscussionsUseCase,
    SaveConsensusInput, SaveConsensusUseCase, SubmitInput, TaskLifecycleController,
};
use annotation_domain::{AnnotationData, DiscussionFilter, DiscussionId, OutputFormat};
use annotation_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLogger, LocalStore, StaticIdentityProvider,
    read_discussions,
};
use annotation_presentation::{
    BaseDataArgs, Cli, Command, ConsensusCommand, ConsoleFormatter, ConsoleLifecycleNotifier,
    DataArgs, FormCommand, ImportProgressReporter, ListArgs, SimpleImportProgress, formatter_for,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.file_path());

    info!("Starting Annotation Quorum");

    for issue in config.check()? {
        warn!("{}", issue.message);
    }

    let format = config.output.resolve_format(cli.output.map(Into::into));
    if !config.output.color || format == OutputFormat::Json {
        colored::control::set_override(false);
    }
    let formatter = formatter_for(format);

    let command = match cli.command {
        Command::Config => return print_config(&config, format),
        command => command,
    };

    // === Dependency Injection ===
    let store = match cli.store.clone().or_else(|| config.storage.path.clone()) {
        Some(path) => Arc::new(
            LocalStore::open(path.clone())
                .with_context(|| format!("Failed to open store {}", path.display()))?,
        ),
        None => {
            warn!("No storage path configured; changes are kept in memory only");
            Arc::new(LocalStore::in_memory())
        }
    };

    let audit: Arc<dyn AuditLogger> =
        match config.logging.audit_log_path().and_then(JsonlAuditLogger::new) {
            Some(logger) => {
                debug!("Audit log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoAuditLogger),
        };

    let (config_role, _) = config.identity.parse_role();
    let identity = StaticIdentityProvider::resolve(
        &[cli.user.as_deref(), config.identity.user.as_deref()],
        cli.role.unwrap_or(config_role),
    );
    let actor = identity.current_actor();
    debug!("Acting as {} ({})", actor.user_id, actor.role);

    let consensus_config = config.consensus.to_consensus_config();
    let show_progress = !cli.quiet && format == OutputFormat::Text;

    let output = match command {
        Command::Import { file } => {
            let discussions = read_discussions(&file)?;
            let use_case = ImportDiscussionsUseCase::new(store.clone()).with_audit_logger(audit);
            // Progress bars fight with log lines, so fall back to plain text under -v
            let report = if !show_progress {
                use_case.execute(discussions).await?
            } else if cli.verbose > 0 {
                use_case
                    .execute_with_progress(discussions, &SimpleImportProgress)
                    .await?
            } else {
                use_case
                    .execute_with_progress(discussions, &ImportProgressReporter::new())
                    .await?
            };
            formatter.imported(&report)
        }

        Command::List(args) => {
            let use_case = QueryDiscussionsUseCase::new(store.clone(), store.clone(), store.clone());
            let discussions = use_case.list(&build_filter(args)).await?;
            formatter.discussions(&discussions)
        }

        Command::Show { discussion } => {
            let use_case = QueryDiscussionsUseCase::new(store.clone(), store.clone(), store.clone());
            let overview = use_case.overview(&DiscussionId::new(discussion)).await?;
            formatter.overview(&overview)
        }

        Command::Submit {
            discussion,
            task,
            data,
        } => {
            let notifier: Arc<dyn LifecycleNotifier> = if show_progress {
                Arc::new(ConsoleLifecycleNotifier)
            } else {
                Arc::new(NoLifecycleNotifier)
            };
            let controller = TaskLifecycleController::new(store.clone(), store.clone(), store.clone())
                .with_config(consensus_config)
                .with_notifier(notifier)
                .with_audit_logger(audit);

            let input = SubmitInput::new(discussion, task, actor, read_data(&data)?);
            let outcome = controller.submit(input).await?;
            formatter.submitted(&outcome)
        }

        Command::Status {
            discussion,
            task,
            status,
        } => {
            let controller = TaskLifecycleController::new(store.clone(), store.clone(), store.clone())
                .with_config(consensus_config)
                .with_audit_logger(audit);
            let updated = controller
                .set_status(&DiscussionId::new(discussion), task, status, &actor)
                .await?;
            formatter.status_changed(&updated, task)
        }

        Command::Consensus(ConsensusCommand::Show { discussion, task }) => {
            let use_case = ComputeConsensusUseCase::new(store.clone(), store.clone(), store.clone());
            let record = use_case.get(&DiscussionId::new(discussion), task).await?;
            formatter.consensus_record(record.as_ref())
        }

        Command::Consensus(ConsensusCommand::Compute { discussion, task }) => {
            let use_case = ComputeConsensusUseCase::new(store.clone(), store.clone(), store.clone())
                .with_config(consensus_config);
            let discussion_id = DiscussionId::new(discussion);
            let result = use_case.compute(&discussion_id, task).await?;
            formatter.consensus_result(&discussion_id, task, &result)
        }

        Command::Consensus(ConsensusCommand::Save {
            discussion,
            task,
            data,
            stars,
            comment,
        }) => {
            let mut input = SaveConsensusInput::new(discussion, task, read_data(&data)?);
            if let Some(stars) = stars {
                input = input.with_stars(stars);
            }
            if let Some(comment) = comment {
                input = input.with_comment(comment);
            }

            let use_case =
                SaveConsensusUseCase::new(store.clone(), store.clone()).with_audit_logger(audit);
            let record = use_case.execute(input, &actor).await?;
            formatter.consensus_record(Some(&record))
        }

        Command::Form(form) => {
            let (discussion, edit, base) = match form {
                FormCommand::Add {
                    discussion,
                    kind,
                    base,
                } => (discussion, FormEdit::Add(kind.into()), base),
                FormCommand::Duplicate {
                    discussion,
                    source,
                    kind,
                    base,
                } => (
                    discussion,
                    FormEdit::Duplicate {
                        source,
                        kind: kind.into(),
                    },
                    base,
                ),
            };

            let mut input = FormEditInput::new(discussion, actor.user_id.clone(), edit);
            if let Some(data) = read_base_data(&base)? {
                input = input.with_base(data);
            }
            let use_case = EditFormsUseCase::new(store.clone(), store.clone());
            let outcome = use_case.execute(input).await?;
            formatter.form_edited(&outcome)
        }

        Command::Config => return print_config(&config, format),
    };

    print!("{}", output);
    if format == OutputFormat::Json {
        println!();
    }

    Ok(())
}

/// Install the stderr subscriber and, if configured, a non-blocking file writer
fn init_tracing(verbose: u8, log_file: Option<PathBuf>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_file.as_deref().and_then(|path| {
        let name = path.file_name()?;
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        Some(tracing_appender::rolling::never(
            dir.unwrap_or_else(|| Path::new(".")),
            name,
        ))
    }) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn build_filter(args: ListArgs) -> DiscussionFilter {
    let mut filter =
        DiscussionFilter::new().with_created_between(args.from, args.to);
    if let (Some(task), Some(status)) = (args.task, args.status) {
        filter = filter.with_status(task, status);
    }
    if let Some(search) = args.search {
        filter = filter.with_search(search);
    }
    if let Some(language) = args.language {
        filter = filter.with_language(language);
    }
    if let Some(batch) = args.batch {
        filter = filter.with_batch(batch);
    }
    filter
}

fn read_data(args: &DataArgs) -> Result<AnnotationData> {
    parse_data(args.data.as_deref(), args.file.as_deref())?
        .ok_or_else(|| anyhow!("Either --data or --file is required"))
}

fn read_base_data(args: &BaseDataArgs) -> Result<Option<AnnotationData>> {
    parse_data(args.data.as_deref(), args.file.as_deref())
}

fn parse_data(data: Option<&str>, file: Option<&Path>) -> Result<Option<AnnotationData>> {
    let raw = match (data, file) {
        (Some(json), _) => json.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => return Ok(None),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .context("Annotation data must be a JSON object")
}

fn print_config(config: &FileConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Text {
        print!(
            "{}",
            ConsoleFormatter::format_config_sources(&ConfigLoader::config_sources())
        );
        println!();
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
