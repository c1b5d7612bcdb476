use std::path::PathBuf;

use crate::error::{Error, Result};

/// How much the run reports besides the chart: 0 nothing, 1 failing
/// operations and per-cell outcomes, 2 every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Verbosity = Verbosity(0);
    pub const FAILURES: Verbosity = Verbosity(1);
    pub const ALL: Verbosity = Verbosity(2);

    pub fn new(level: u8) -> Self {
        Self(level.min(Self::ALL.0))
    }

    pub fn filter(self) -> &'static str {
        match self.0 {
            0 => "warn",
            1 => "warn,lockchart=debug,lock_probe=debug",
            _ => "warn,lockchart=trace,lock_probe=trace",
        }
    }

    /// Flag that hands the same level to a probe process.
    pub fn flag(self) -> Option<&'static str> {
        match self.0 {
            0 => None,
            1 => Some("-v"),
            _ => Some("-vv"),
        }
    }
}

/// Run-wide settings, passed down explicitly rather than kept in globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub verbosity: Verbosity,
    /// `lock_probe` executable that plays the second party.
    pub probe: PathBuf,
}

impl Config {
    /// Without an explicit `probe`, looks for `lock_probe` next to the
    /// running executable.
    pub fn new(verbosity: Verbosity, probe: Option<PathBuf>) -> Result<Self> {
        let probe = match probe {
            Some(probe) => probe,
            None => default_probe()?,
        };
        if !probe.is_file() {
            return Err(Error::ProbeNotFound(probe));
        }
        Ok(Self { verbosity, probe })
    }
}

fn default_probe() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(Error::CurrentExe)?;
    Ok(exe.with_file_name(format!("lock_probe{}", std::env::consts::EXE_SUFFIX)))
}
