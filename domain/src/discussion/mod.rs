//! Discussions and their three task slots.

pub mod entities;
pub mod filter;
pub mod status;
pub mod task;

pub use entities::{Discussion, TaskState, TaskStates};
pub use filter::DiscussionFilter;
pub use status::TaskStatus;
pub use task::TaskId;
