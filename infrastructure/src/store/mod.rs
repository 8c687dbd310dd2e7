//! Storage adapters
//!
//! - [`LocalStore`] implements the discussion, annotation and consensus ports
//! - [`read_discussions`] reads import batches

mod error;
mod import;
mod local_store;
mod snapshot;

pub use error::StoreError;
pub use import::read_discussions;
pub use local_store::LocalStore;
