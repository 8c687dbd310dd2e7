//! Reading discussion batches for import.
//!
//! A batch file is a JSON array of discussions. Only `id`, `title`, `url`
//! and `repository` are required; task states default to a fresh lifecycle.

use super::error::StoreError;
use annotation_domain::Discussion;
use std::path::Path;
use tracing::debug;

/// Read a JSON array of discussions from `path`
pub fn read_discussions(path: &Path) -> Result<Vec<Discussion>, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::io(path, e))?;
    let discussions: Vec<Discussion> =
        serde_json::from_slice(&bytes).map_err(|e| StoreError::json(path, e))?;
    debug!("Read {} discussion(s) from {}", discussions.len(), path.display());
    Ok(discussions)
}
