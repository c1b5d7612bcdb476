use std::io;
use std::path::PathBuf;

/// Harness failures. A refused open or lock is never one of these: it is the
/// measurement and travels as a `false` verdict.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn lock probe {}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for lock probe")]
    Wait(#[source] io::Error),
    #[error("failed to close the lock holder's handle")]
    Release(#[source] io::Error),
    #[error("cannot locate the running executable")]
    CurrentExe(#[source] io::Error),
    #[error("lock probe not found at {}", .0.display())]
    ProbeNotFound(PathBuf),
    #[error("outcome for cell ({row}, {col}) recorded twice")]
    DuplicateCell { row: usize, col: usize },
    #[error("outcome grid incomplete: {missing} cells unset")]
    IncompleteGrid { missing: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
