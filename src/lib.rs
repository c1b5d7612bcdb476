//! Charts how two processes' whole-file locks interact on a filesystem.
//!
//! For each of the 81 combinations of (disposition, access intent) for a
//! holder and a contender, the holder opens and locks its path in this
//! process, then a separate `lock_probe` process tries the contender's open
//! and lock. Whether the contender got through is the verdict for that cell.

#[cfg(not(unix))]
compile_error!("lockchart probes POSIX lock semantics and needs a unix host");

pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod matrix;
pub mod path;
pub mod report;
pub mod trial;

pub use config::{Config, Verbosity};
pub use error::{Error, Result};
pub use lock::{AccessIntent, Disposition, Mechanism};
pub use matrix::{Cell, OutcomeGrid, Party, sweep};
pub use path::Fork;
pub use report::Chart;
pub use trial::{Isolate, ProbeProcess, Request};
