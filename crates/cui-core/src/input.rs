//! Byte-level input devices and the raw-mode guard they hand out.

use std::io;
use std::time::Duration;

/// A source of keyboard bytes and text lines.
///
/// Implemented by [`Tty`](crate::tty::Tty) for the real terminal and by
/// [`ScriptedInput`](crate::testing::ScriptedInput) for tests.
pub trait Input {
    /// Switch the device to unbuffered, no-echo mode until the returned guard
    /// is dropped.
    fn raw_mode(&mut self) -> crate::Result<RawModeGuard>;

    /// Block until one byte is available. `Ok(None)` means end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Wait at most `timeout` for one byte. `Ok(None)` means nothing arrived
    /// in time (or the stream ended).
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;

    /// Read one line in the device's normal (cooked) mode.
    ///
    /// The trailing newline, and a carriage return before it, are removed.
    /// `Ok(None)` means the stream ended before any byte of a new line.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        loop {
            match self.read_byte()? {
                Some(b'\n') => break,
                Some(byte) => bytes.push(byte),
                None if bytes.is_empty() => return Ok(None),
                None => break,
            }
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

impl<T: Input + ?Sized> Input for &mut T {
    fn raw_mode(&mut self) -> crate::Result<RawModeGuard> {
        (**self).raw_mode()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        (**self).poll_byte(timeout)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

/// Restores the device's previous mode when dropped.
///
/// The guard owns the release action rather than a borrow of the device, so
/// the device stays usable for reads while the guard is alive. Release runs
/// on every exit path, including `?` propagation and unwinding.
#[must_use = "raw mode is released as soon as the guard is dropped"]
pub struct RawModeGuard {
    release: Option<Box<dyn FnOnce() -> io::Result<()>>>,
}

impl RawModeGuard {
    /// A guard that does nothing on release; used when raw mode was already
    /// active before the guard was requested.
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// A guard that runs `release` exactly once when dropped.
    pub fn on_release(release: impl FnOnce() -> io::Result<()> + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release now and report whether restoring the previous mode worked.
    pub fn release(mut self) -> io::Result<()> {
        match self.release.take() {
            Some(release) => release(),
            None => Ok(()),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            if let Err(err) = release() {
                tracing::warn!(error = %err, "failed to restore terminal mode");
            }
        }
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn guard_releases_on_drop() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        {
            let _guard = RawModeGuard::on_release(move || {
                counter.set(counter.get() + 1);
                Ok(())
            });
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn explicit_release_runs_once() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let guard = RawModeGuard::on_release(move || {
            counter.set(counter.get() + 1);
            Ok(())
        });
        guard.release().unwrap();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn release_error_is_reported() {
        let guard = RawModeGuard::on_release(|| Err(io::Error::other("stuck")));
        assert!(guard.release().is_err());
        assert!(RawModeGuard::noop().release().is_ok());
    }

    #[test]
    fn guard_releases_during_unwind() {
        let released = Rc::new(Cell::new(false));
        let flag = released.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RawModeGuard::on_release(move || {
                flag.set(true);
                Ok(())
            });
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(released.get());
    }
}
