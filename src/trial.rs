//! One two-party trial: the holder opens and locks its file in this process,
//! then a separate process attempts the second request while the holder's
//! lock is still in place.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{info_span, warn};

use crate::config::{Config, Verbosity};
use crate::error::{Error, Result};
use crate::lock::{self, AccessIntent, Disposition, Mechanism};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: PathBuf,
    pub intent: AccessIntent,
    pub disposition: Disposition,
    pub mechanism: Mechanism,
}

impl Request {
    pub fn new(
        path: impl Into<PathBuf>,
        intent: AccessIntent,
        disposition: Disposition,
        mechanism: Mechanism,
    ) -> Self {
        Self {
            path: path.into(),
            intent,
            disposition,
            mechanism,
        }
    }

    /// Non-blocking open, with the reservation flags already folded in.
    pub fn open(&self) -> io::Result<File> {
        let extra = self.mechanism.open_flags(self.disposition);
        let result = self
            .intent
            .open_options()
            .custom_flags(extra | libc::O_NONBLOCK)
            .open(&self.path);
        let flags = self.intent.mode_flags() | extra;
        lock::report(
            &format!("open({}, {flags:#04x})", self.path.display()),
            &result,
        );
        result
    }

    /// Opens and locks; `None` if either step is refused. On a refused lock
    /// the handle is closed before returning.
    pub fn acquire(&self) -> Option<File> {
        let file = self.open().ok()?;
        lock::apply(&file, self.disposition, self.mechanism).ok()?;
        Some(file)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} with {} {}",
            self.intent.describe(),
            self.disposition.adjective(),
            self.mechanism
        )
    }

    /// Arguments that make `lock_probe` repeat this request.
    pub fn to_probe_args(&self) -> Vec<OsString> {
        vec![
            "--intent".into(),
            self.intent.as_arg().into(),
            "--lock".into(),
            self.disposition.as_arg().into(),
            "--mechanism".into(),
            self.mechanism.as_arg().into(),
            "--".into(),
            self.path.clone().into_os_string(),
        ]
    }
}

/// Runs a request somewhere that shares no memory, descriptors or lock
/// ownership with the caller, blocking until it reports back.
pub trait Isolate {
    fn contend(&self, request: &Request) -> Result<bool>;
}

impl<F> Isolate for F
where
    F: Fn(&Request) -> Result<bool>,
{
    fn contend(&self, request: &Request) -> Result<bool> {
        self(request)
    }
}

/// Plays the second party in a fresh `lock_probe` process.
#[derive(Debug, Clone)]
pub struct ProbeProcess {
    program: PathBuf,
    verbosity: Verbosity,
}

impl ProbeProcess {
    pub fn new(config: &Config) -> Self {
        Self::with_program(&config.probe, config.verbosity)
    }

    pub fn with_program(program: impl Into<PathBuf>, verbosity: Verbosity) -> Self {
        Self {
            program: program.into(),
            verbosity,
        }
    }
}

impl Isolate for ProbeProcess {
    fn contend(&self, request: &Request) -> Result<bool> {
        let mut command = Command::new(&self.program);
        command.args(self.verbosity.flag());
        command.args(request.to_probe_args()).stdin(Stdio::null());

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;
        let status = child.wait().map_err(Error::Wait)?;

        Ok(match status.code() {
            Some(0) => true,
            Some(1) => false,
            Some(code) => {
                warn!(code, "lock probe exited with unexpected status");
                false
            }
            None => {
                warn!(signal = status.signal(), "lock probe terminated abnormally");
                false
            }
        })
    }
}

/// Whether `second` is granted while `first` is held.
///
/// If `first` itself is refused the trial ends there with `false` and no
/// second party is started. Closing the holder's handle afterwards must
/// succeed, otherwise the next trial on the same file could see a stale lock.
pub fn run<I>(first: &Request, second: &Request, isolate: &I) -> Result<bool>
where
    I: Isolate + ?Sized,
{
    let held = {
        let _outer = info_span!("outer").entered();
        match first.acquire() {
            Some(file) => file,
            None => return Ok(false),
        }
    };

    let verdict = isolate.contend(second);
    lock::release(held).map_err(Error::Release)?;
    verdict
}
