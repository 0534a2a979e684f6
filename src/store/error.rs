use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by store persistence.
///
/// Structural edits report failure through their boolean or `Option`
/// results; only file I/O produces an error value.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tracks file could not be opened for reading or created for
    /// writing.
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// I/O failure while streaming rows.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
