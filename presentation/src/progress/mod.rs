//! Progress and lifecycle notices on the terminal

pub mod notifier;
pub mod reporter;
