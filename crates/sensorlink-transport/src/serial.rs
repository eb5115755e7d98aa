use std::ffi::CString;
use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Result, TransportError};

/// Default line speed in baud.
pub const DEFAULT_BAUD: u32 = 9600;

/// Line configuration applied on every device acquisition.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Line speed in baud. Must be one of the supported termios rates.
    pub baud: u32,
    /// Bounded wait for the device to become writable before each write.
    /// `None` writes immediately and lets a busy device fail the write.
    pub write_timeout: Option<Duration>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: DEFAULT_BAUD,
            write_timeout: None,
        }
    }
}

fn speed_constant(baud: u32) -> Option<libc::speed_t> {
    match baud {
        1200 => Some(libc::B1200),
        2400 => Some(libc::B2400),
        4800 => Some(libc::B4800),
        9600 => Some(libc::B9600),
        19200 => Some(libc::B19200),
        38400 => Some(libc::B38400),
        57600 => Some(libc::B57600),
        115200 => Some(libc::B115200),
        _ => None,
    }
}

/// Check a baud rate against the supported termios speed set without
/// touching any device.
pub fn validate_baud(baud: u32) -> Result<()> {
    speed_constant(baud)
        .map(|_| ())
        .ok_or(TransportError::UnsupportedBaud { baud })
}

/// A write-only handle on a serial device.
///
/// The handle owns the descriptor; dropping it closes the device, so
/// release is guaranteed on every exit path. The device is opened
/// non-blocking and never becomes the controlling terminal.
#[derive(Debug)]
pub struct SerialPort {
    file: File,
    path: PathBuf,
    write_timeout: Option<Duration>,
}

impl SerialPort {
    /// Open and configure the device at `path`.
    pub fn open(path: impl AsRef<Path>, config: &SerialConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let speed = speed_constant(config.baud)
            .ok_or(TransportError::UnsupportedBaud { baud: config.baud })?;

        let cpath =
            CString::new(path.as_os_str().as_bytes()).map_err(|_| TransportError::Unavailable {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL byte"),
            })?;

        // SAFETY: `cpath` is a valid NUL-terminated string for the duration
        // of the call.
        let fd = unsafe {
            libc::open(
                cpath.as_ptr(),
                libc::O_WRONLY | libc::O_NOCTTY | libc::O_NONBLOCK,
            )
        };
        if fd < 0 {
            return Err(TransportError::Unavailable {
                path,
                source: io::Error::last_os_error(),
            });
        }

        // SAFETY: `fd` was just returned by `open` and is owned by nothing else.
        let file = File::from(unsafe { OwnedFd::from_raw_fd(fd) });

        let port = Self {
            file,
            path,
            write_timeout: config.write_timeout,
        };

        if let Err(err) = port.configure_line(speed) {
            // Non-tty sinks (pipes, regular files) reject termios calls;
            // line settings only matter on a real serial device.
            warn!(path = ?port.path, %err, "serial line configuration not applied");
        }

        debug!(path = ?port.path, baud = config.baud, "serial device acquired");
        Ok(port)
    }

    /// Apply line settings: speed in both directions, receiver enabled,
    /// modem control lines ignored. Takes effect immediately, no drain.
    fn configure_line(&self, speed: libc::speed_t) -> io::Result<()> {
        let fd = self.file.as_raw_fd();

        let mut options = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: `options` points to writable storage for one termios value
        // and `fd` is an open descriptor owned by `self`.
        if unsafe { libc::tcgetattr(fd, options.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: tcgetattr returned 0, so `options` is initialized.
        let mut options = unsafe { options.assume_init() };

        // SAFETY: `options` is a valid termios value obtained above.
        unsafe {
            libc::cfsetispeed(&mut options, speed);
            libc::cfsetospeed(&mut options, speed);
        }
        options.c_cflag |= libc::CLOCAL | libc::CREAD;

        // SAFETY: `options` is valid and `fd` is open.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &options) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Block until the device is writable or the deadline passes.
    fn wait_writable(&self, timeout: Duration) -> io::Result<()> {
        let mut pollfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLOUT,
            revents: 0,
        };
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        // SAFETY: `pollfd` points to one valid pollfd for the call.
        let ready = unsafe { libc::poll(&mut pollfd, 1, millis) };
        if ready < 0 {
            return Err(io::Error::last_os_error());
        }
        if ready == 0 {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "serial device not writable before deadline",
            ));
        }
        Ok(())
    }

    /// The device path this handle was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for SerialPort {
    /// One write syscall. A short count is returned as-is; completion
    /// policy belongs to the caller.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(timeout) = self.write_timeout {
            self.wait_writable(timeout)?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        debug!(path = ?self.path, "serial device released");
    }
}
