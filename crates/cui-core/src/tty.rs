//! The real terminal device (unix only).
//!
//! Bytes are read straight from the file descriptor with no userspace
//! buffering, so key reads and line reads never disagree about what has
//! already been consumed. Raw mode is delegated to crossterm.

use crate::error::{Error, Result};
use crate::input::{Input, RawModeGuard};
use std::fs::File;
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

/// An interactive terminal opened for reading.
pub struct Tty {
    source: Source,
}

enum Source {
    Stdin,
    Device(File),
}

impl Tty {
    /// Use standard input, which must be a terminal.
    pub fn stdin() -> Result<Self> {
        let tty = Self {
            source: Source::Stdin,
        };
        tty.ensure_terminal()?;
        Ok(tty)
    }

    /// Open the controlling terminal directly (`/dev/tty`), which keeps
    /// keyboard input working when stdin is a pipe.
    pub fn controlling() -> Result<Self> {
        let file = File::open("/dev/tty").map_err(|_| Error::NotATerminal)?;
        Self::terminal_device(file)
    }

    fn terminal_device(file: File) -> Result<Self> {
        let tty = Self::from_device(file);
        tty.ensure_terminal()?;
        Ok(tty)
    }

    /// Read from any open descriptor, terminal or not.
    pub(crate) fn from_device(file: File) -> Self {
        Self {
            source: Source::Device(file),
        }
    }

    fn fd(&self) -> RawFd {
        match &self.source {
            Source::Stdin => libc::STDIN_FILENO,
            Source::Device(file) => file.as_raw_fd(),
        }
    }

    fn ensure_terminal(&self) -> Result<()> {
        // SAFETY: isatty only inspects the descriptor.
        if unsafe { libc::isatty(self.fd()) } == 1 {
            Ok(())
        } else {
            Err(Error::NotATerminal)
        }
    }

    /// Wait until the descriptor is readable or `timeout` passes.
    ///
    /// `select` is used rather than `poll` because the escape timeout is well
    /// below poll's one-millisecond resolution.
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let fd = self.fd();
        loop {
            let mut tv = libc::timeval {
                tv_sec: timeout.as_secs() as libc::time_t,
                tv_usec: timeout.subsec_micros() as libc::suseconds_t,
            };
            // SAFETY: the fd_set is zero-initialised and only touched through
            // the libc helpers; `fd` is an open descriptor below FD_SETSIZE.
            let ready = unsafe {
                let mut set: libc::fd_set = std::mem::zeroed();
                libc::FD_ZERO(&mut set);
                libc::FD_SET(fd, &mut set);
                libc::select(
                    fd + 1,
                    &mut set,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    &mut tv,
                )
            };
            if ready >= 0 {
                return Ok(ready > 0);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

impl Input for Tty {
    fn raw_mode(&mut self) -> Result<RawModeGuard> {
        if crossterm::terminal::is_raw_mode_enabled().map_err(Error::RawMode)? {
            return Ok(RawModeGuard::noop());
        }
        crossterm::terminal::enable_raw_mode().map_err(Error::RawMode)?;
        tracing::debug!("raw mode enabled");
        Ok(RawModeGuard::on_release(|| {
            tracing::debug!("raw mode released");
            crossterm::terminal::disable_raw_mode()
        }))
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            // SAFETY: reading one byte into a valid, owned buffer.
            let n = unsafe { libc::read(self.fd(), (&mut byte as *mut u8).cast(), 1) };
            match n {
                1 => return Ok(Some(byte)),
                0 => return Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() != io::ErrorKind::Interrupted {
                        return Err(err);
                    }
                }
            }
        }
    }

    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if self.wait_readable(timeout)? {
            self.read_byte()
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_sequence::ESCAPE_TIMEOUT;
    use std::io::Write;
    use std::os::fd::FromRawFd;
    use std::time::Instant;

    /// A pipe as (read end, write end).
    fn pipe() -> (File, File) {
        let mut fds = [0 as RawFd; 2];
        // SAFETY: `fds` has room for both descriptors.
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0, "pipe: {}", io::Error::last_os_error());
        // SAFETY: both descriptors were just opened and each gets one owner.
        unsafe { (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1])) }
    }

    fn device() -> (Tty, File) {
        let (read_end, write_end) = pipe();
        (Tty::from_device(read_end), write_end)
    }

    #[test]
    fn poll_returns_a_waiting_byte() {
        let (mut tty, mut writer) = device();
        writer.write_all(b"xy").unwrap();
        assert_eq!(tty.poll_byte(Duration::from_millis(100)).unwrap(), Some(b'x'));
        assert_eq!(tty.read_byte().unwrap(), Some(b'y'));
    }

    #[test]
    fn poll_on_silent_device_times_out() {
        let (mut tty, _writer) = device();
        let started = Instant::now();
        assert_eq!(tty.poll_byte(Duration::from_millis(5)).unwrap(), None);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn escape_window_stays_short() {
        let (mut tty, _writer) = device();
        let started = Instant::now();
        assert_eq!(tty.poll_byte(ESCAPE_TIMEOUT).unwrap(), None);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn closed_writer_reads_as_end_of_input() {
        let (mut tty, writer) = device();
        drop(writer);
        assert_eq!(tty.read_byte().unwrap(), None);
        assert_eq!(tty.poll_byte(Duration::from_millis(5)).unwrap(), None);
    }

    #[test]
    fn lines_are_read_unbuffered() {
        let (mut tty, mut writer) = device();
        writer.write_all(b"ab\r\ncd\n").unwrap();
        assert_eq!(tty.read_line().unwrap().as_deref(), Some("ab"));
        // The second line is still in the pipe, not in a userspace buffer.
        assert_eq!(tty.poll_byte(Duration::from_millis(100)).unwrap(), Some(b'c'));
    }

    #[test]
    fn pipe_is_not_a_terminal() {
        let (read_end, _writer) = pipe();
        assert!(matches!(
            Tty::terminal_device(read_end),
            Err(Error::NotATerminal)
        ));
    }
}
