//! Presentation layer for annotation-quorum
//!
//! This crate contains CLI definitions, output formatters,
//! import progress reporters and console lifecycle notices.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    BaseDataArgs, Cli, Command, ConsensusCommand, DataArgs, FormCommand, FormKindArg, ListArgs,
    OutputFormat,
};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, OutputFormatter, formatter_for};
pub use progress::notifier::ConsoleLifecycleNotifier;
pub use progress::reporter::{ImportProgressReporter, SimpleImportProgress};
