#![allow(dead_code)]

use std::io::Write;

use anyhow::Result;
use lockchart::{AccessIntent, Disposition, ProbeProcess, Verbosity};
use tempfile::NamedTempFile;

pub fn probe() -> ProbeProcess {
    ProbeProcess::with_program(env!("CARGO_BIN_EXE_lock_probe"), Verbosity::QUIET)
}

pub fn scratch() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"lockchart scratch file")?;
    file.flush()?;
    Ok(file)
}

pub fn conflicts(a: Disposition, b: Disposition) -> bool {
    a != Disposition::None
        && b != Disposition::None
        && (a == Disposition::Exclusive || b == Disposition::Exclusive)
}

/// Whether a record lock of this kind can be placed through a handle opened
/// this way: write locks need write access, read locks read access.
pub fn record_lock_allowed(disposition: Disposition, intent: AccessIntent) -> bool {
    match disposition {
        Disposition::None => true,
        Disposition::Exclusive => intent != AccessIntent::ReadOnly,
        Disposition::Shared => intent != AccessIntent::WriteOnly,
    }
}
