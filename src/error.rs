//! Fatal harness errors
//!
//! A stage returning non-zero is not an error here; it is an [`Outcome`](crate::pipeline::Outcome). These are the
//! environment failures that end the whole run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("cannot create output directory '{}': {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
