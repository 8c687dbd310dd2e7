//! Progress notification port for discussion imports

/// Callback for progress updates during an import
pub trait ImportProgress: Send + Sync {
    /// Called before the first discussion is processed
    fn on_start(&self, total: usize);

    /// Called after each discussion; `imported` is false for skipped ids
    fn on_discussion(&self, id: &str, imported: bool);

    /// Called after the last discussion
    fn on_finish(&self, imported: usize, skipped: usize);
}

/// No-op progress for when progress reporting is not needed
pub struct NoImportProgress;

impl ImportProgress for NoImportProgress {
    fn on_start(&self, _total: usize) {}
    fn on_discussion(&self, _id: &str, _imported: bool) {}
    fn on_finish(&self, _imported: usize, _skipped: usize) {}
}
