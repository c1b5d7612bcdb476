//! Lock primitives: turns a (disposition, mechanism) pair into the calls that
//! take that lock on a file handle.
//!
//! Nothing in here blocks. Every lock request is issued in its non-blocking
//! form and a refusal comes back as an `Err` carrying the OS cause, which the
//! caller treats as a measurement rather than a failure of the tool.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::{AsRawFd, IntoRawFd};

use clap::ValueEnum;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Disposition {
    #[value(name = "exclusive")]
    Exclusive = 0,
    #[value(name = "shared")]
    Shared = 1,
    #[value(name = "none")]
    None = 2,
}

impl Disposition {
    pub const ALL: [Disposition; 3] = [Self::Exclusive, Self::Shared, Self::None];

    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Shared => "shared",
            Self::None => "none",
        }
    }

    /// Name used in "read only with exclusive flock" descriptions.
    pub fn adjective(self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Shared => "shared",
            Self::None => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Mechanism {
    /// Lock taken by the open call itself (`O_EXLOCK`/`O_SHLOCK`).
    #[value(name = "sharemode")]
    OpenTimeReservation,
    #[value(name = "flock")]
    WholeFileAdvisory,
    /// `fcntl(F_SETLK)` record lock spanning the whole file.
    #[value(name = "fcntl")]
    RecordLock,
}

impl Mechanism {
    pub const ALL: [Mechanism; 3] = [
        Self::OpenTimeReservation,
        Self::WholeFileAdvisory,
        Self::RecordLock,
    ];

    pub fn as_arg(self) -> &'static str {
        match self {
            Self::OpenTimeReservation => "sharemode",
            Self::WholeFileAdvisory => "flock",
            Self::RecordLock => "fcntl",
        }
    }

    /// Extra flags to OR into the open call before the handle exists.
    pub fn open_flags(self, disposition: Disposition) -> libc::c_int {
        match (self, disposition) {
            (_, Disposition::None) => 0,
            (Self::OpenTimeReservation, disposition) => reservation_flags(disposition),
            (Self::WholeFileAdvisory | Self::RecordLock, _) => 0,
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum AccessIntent {
    #[value(name = "read-only")]
    ReadOnly = 0,
    #[value(name = "write-only")]
    WriteOnly = 1,
    #[value(name = "read-write")]
    ReadWrite = 2,
}

impl AccessIntent {
    pub const ALL: [AccessIntent; 3] = [Self::ReadOnly, Self::WriteOnly, Self::ReadWrite];

    pub fn as_arg(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
            Self::ReadWrite => "read-write",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::ReadOnly => "read only",
            Self::WriteOnly => "write only",
            Self::ReadWrite => "read/write",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Self::ReadOnly => "R",
            Self::WriteOnly => "W",
            Self::ReadWrite => "RW",
        }
    }

    pub fn mode_flags(self) -> libc::c_int {
        match self {
            Self::ReadOnly => libc::O_RDONLY,
            Self::WriteOnly => libc::O_WRONLY,
            Self::ReadWrite => libc::O_RDWR,
        }
    }

    /// Never creates or truncates: the target must already exist.
    pub fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Self::ReadOnly => options.read(true),
            Self::WriteOnly => options.write(true),
            Self::ReadWrite => options.read(true).write(true),
        };
        options
    }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod reservation {
    use super::Disposition;

    pub const NATIVE: bool = true;

    pub fn flags(disposition: Disposition) -> libc::c_int {
        match disposition {
            Disposition::Exclusive => libc::O_EXLOCK,
            Disposition::Shared => libc::O_SHLOCK,
            Disposition::None => 0,
        }
    }
}

// No O_EXLOCK/O_SHLOCK here. The reservation is taken with flock right after
// the open, which is what the BSD kernels do for those flags anyway.
#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
mod reservation {
    use super::Disposition;

    pub const NATIVE: bool = false;

    pub fn flags(_disposition: Disposition) -> libc::c_int {
        0
    }
}

pub const NATIVE_RESERVATION: bool = reservation::NATIVE;

fn reservation_flags(disposition: Disposition) -> libc::c_int {
    reservation::flags(disposition)
}

/// Takes `disposition` on an already open handle.
///
/// `Disposition::None` never touches the handle. An open-time reservation has
/// nothing left to do once the handle exists, except on hosts where it has to
/// be emulated.
pub fn apply(file: &File, disposition: Disposition, mechanism: Mechanism) -> io::Result<()> {
    if disposition == Disposition::None {
        return Ok(());
    }
    match mechanism {
        Mechanism::OpenTimeReservation if NATIVE_RESERVATION => Ok(()),
        Mechanism::OpenTimeReservation | Mechanism::WholeFileAdvisory => flock(file, disposition),
        Mechanism::RecordLock => fcntl(file, disposition),
    }
}

fn flock(file: &File, disposition: Disposition) -> io::Result<()> {
    let (acquired, op) = match disposition {
        Disposition::Exclusive => (
            fs4::fs_std::FileExt::try_lock_exclusive(file),
            "LOCK_EX|LOCK_NB",
        ),
        Disposition::Shared => (
            fs4::fs_std::FileExt::try_lock_shared(file),
            "LOCK_SH|LOCK_NB",
        ),
        Disposition::None => return Ok(()),
    };
    let result = match acquired {
        Ok(true) => Ok(()),
        Ok(false) => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        Err(e) => Err(e),
    };
    report(&format!("flock({}, {op})", file.as_raw_fd()), &result);
    result
}

fn fcntl(file: &File, disposition: Disposition) -> io::Result<()> {
    let (l_type, name) = match disposition {
        Disposition::Exclusive => (libc::F_WRLCK, "F_WRLCK"),
        Disposition::Shared => (libc::F_RDLCK, "F_RDLCK"),
        Disposition::None => return Ok(()),
    };

    // SAFETY: `struct flock` is plain old data; all-zero is a valid value.
    let mut lock: libc::flock = unsafe { std::mem::zeroed() };
    lock.l_type = l_type as libc::c_short;
    lock.l_whence = libc::SEEK_SET as libc::c_short;
    // l_start = 0 and l_len = 0: from the first byte to end of file, however
    // far the file grows.
    lock.l_start = 0;
    lock.l_len = 0;

    let fd = file.as_raw_fd();
    // SAFETY: `fd` is owned by `file` for the duration of the call and `lock`
    // outlives it.
    let rc = unsafe { libc::fcntl(fd, libc::F_SETLK, &lock) };
    let result = if rc == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    };
    report(&format!("fcntl({fd}, F_SETLK, {{.l_type = {name}}})"), &result);
    result
}

/// Closes `file` and surfaces the `close(2)` error that `Drop` would swallow.
pub fn release(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: `into_raw_fd` handed us sole ownership of `fd`.
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Failures show at -v, everything at -vv.
pub(crate) fn report<T>(op: &str, result: &io::Result<T>) {
    match result {
        Ok(_) => trace!("{op}"),
        Err(e) => debug!("{op}: {e}"),
    }
}
