//! Progress reporting for discussion imports

use annotation_application::ImportProgress;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports import progress with a progress bar
pub struct ImportProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ImportProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ImportProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportProgress for ImportProgressReporter {
    fn on_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Importing");
        pb.set_message("Starting...");

        *self.bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_discussion(&self, id: &str, imported: bool) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            let status = if imported {
                format!("{} {}", "v".green(), id)
            } else {
                format!("{} {} (exists)", "-".dimmed(), id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_finish(&self, imported: usize, skipped: usize) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish_with_message(format!(
                "{} ({} skipped)",
                format!("{} imported", imported).green(),
                skipped
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleImportProgress;

impl ImportProgress for SimpleImportProgress {
    fn on_start(&self, total: usize) {
        eprintln!("{} {} ({} discussions)", "->".cyan(), "Importing".bold(), total);
    }

    fn on_discussion(&self, id: &str, imported: bool) {
        if imported {
            eprintln!("  {} {}", "v".green(), id);
        } else {
            eprintln!("  {} {} (exists)", "-".dimmed(), id);
        }
    }

    fn on_finish(&self, _imported: usize, _skipped: usize) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_lifecycle() {
        let reporter = ImportProgressReporter::new();
        // Calls before start are ignored
        reporter.on_discussion("d0", true);

        reporter.on_start(2);
        reporter.on_discussion("d1", true);
        reporter.on_discussion("d2", false);
        assert_eq!(
            reporter.bar.lock().unwrap().as_ref().map(|pb| pb.position()),
            Some(2)
        );

        reporter.on_finish(1, 1);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
