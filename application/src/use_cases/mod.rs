//! Use cases (application services)
//!
//! - [`lifecycle_controller`] - submissions, quota and status changes
//! - [`consensus`] - on-demand aggregation and reviewer-authored consensus
//! - [`forms`] - task 3 form add / duplicate
//! - [`query_discussions`] / [`import_discussions`] - discussion catalogue
//! - [`task_locks`] - per-task critical sections shared by the above

pub mod consensus;
pub mod forms;
pub mod import_discussions;
pub mod lifecycle_controller;
pub mod query_discussions;
pub mod task_locks;

#[cfg(test)]
pub(crate) mod test_support;
