//! Single-instance acquisition for the tool family.
//!
//! Each tool takes a named, session-local lock before touching AFxW so two
//! copies of the same tool never drive the shared automation object at once.
//! On Windows the lock is a named mutex and the OS is the sole arbiter: it
//! hands ownership over when the previous holder exits, cleanly or not, so
//! there are no stale PID files or lock files to garbage-collect.

use std::time::Duration;

use thiserror::Error;

/// How long [`AcquirePolicy::BoundedWait`] waits for the previous holder by
/// default.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(3000);

/// What to do when another instance already holds the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquirePolicy {
    /// Report the contention immediately.
    FailFast,
    /// Wait up to `timeout` for the holder to exit, then give up.
    BoundedWait { timeout: Duration },
}

impl AcquirePolicy {
    /// Bounded wait with [`DEFAULT_WAIT`].
    pub fn bounded() -> Self {
        Self::BoundedWait {
            timeout: DEFAULT_WAIT,
        }
    }
}

#[derive(Debug, Error)]
pub enum AcquireError {
    /// Another instance holds the lock. FailFast callers treat this as a
    /// normal, quiet exit rather than a failure.
    #[error("another instance of {0} is already running")]
    AlreadyRunning(String),
    /// The holder did not exit within the wait bound.
    #[error("the running {0} instance did not exit in time")]
    Timeout(String),
    /// The locking primitive itself misbehaved.
    #[error("instance lock failed: {0}")]
    Os(String),
}

/// Take the lock named `name` under `policy`.
///
/// The returned [`InstanceLock`] is meant to be bound in `main` and held for
/// the rest of the process; dropping it releases the lock, and any kind of
/// process death releases it too.
pub fn acquire(name: &str, policy: AcquirePolicy) -> Result<InstanceLock, AcquireError> {
    imp::acquire(name, policy)
}

pub use imp::InstanceLock;

#[cfg(windows)]
mod imp {
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{
        CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE, WAIT_ABANDONED, WAIT_OBJECT_0,
        WAIT_TIMEOUT,
    };
    use windows::Win32::System::Threading::{CreateMutexW, ReleaseMutex, WaitForSingleObject};

    use super::{AcquireError, AcquirePolicy};

    /// Owns the handle to the named mutex. The mutex stays held until the
    /// guard is dropped or the process ends.
    pub struct InstanceLock {
        handle: HANDLE,
    }

    impl Drop for InstanceLock {
        fn drop(&mut self) {
            unsafe {
                // ReleaseMutex only succeeds on the acquiring thread; on any
                // other exit path the OS reclaims the mutex when the last
                // handle goes or the process ends.
                let _ = ReleaseMutex(self.handle);
                let _ = CloseHandle(self.handle);
            }
        }
    }

    pub fn acquire(name: &str, policy: AcquirePolicy) -> Result<InstanceLock, AcquireError> {
        // Session-local namespace; the tools never need to see other logon
        // sessions.
        let mut wide: Vec<u16> = format!("Local\\{name}").encode_utf16().collect();
        wide.push(0);

        let handle = unsafe { CreateMutexW(None, true, PCWSTR(wide.as_ptr())) }
            .map_err(|e| AcquireError::Os(e.message()))?;
        if unsafe { GetLastError() } != ERROR_ALREADY_EXISTS {
            return Ok(InstanceLock { handle });
        }

        // The mutex already exists, so the initial-ownership request above
        // was ignored and `handle` is just a reference to it.
        let timeout = match policy {
            AcquirePolicy::FailFast => {
                unsafe {
                    let _ = CloseHandle(handle);
                }
                return Err(AcquireError::AlreadyRunning(name.to_string()));
            }
            AcquirePolicy::BoundedWait { timeout } => timeout,
        };

        let millis = timeout.as_millis().min(u128::from(u32::MAX - 1)) as u32;
        let event = unsafe { WaitForSingleObject(handle, millis) };
        // An abandoned mutex (holder died without releasing) still transfers
        // ownership to us, exactly like a clean release.
        if event == WAIT_OBJECT_0 || event == WAIT_ABANDONED {
            Ok(InstanceLock { handle })
        } else if event == WAIT_TIMEOUT {
            unsafe {
                let _ = CloseHandle(handle);
            }
            Err(AcquireError::Timeout(name.to_string()))
        } else {
            let err = windows::core::Error::from_win32();
            unsafe {
                let _ = CloseHandle(handle);
            }
            Err(AcquireError::Os(err.message()))
        }
    }
}

#[cfg(not(windows))]
mod imp {
    use std::collections::HashSet;
    use std::sync::{Condvar, Mutex, OnceLock};
    use std::time::Instant;

    use super::{AcquireError, AcquirePolicy};

    /// AFxW only exists on Windows, but the acquisition protocol is portable:
    /// a process-wide registry of held names stands in for the OS namespace
    /// so the crate builds and the protocol tests run on development hosts.
    /// Cross-process exclusion itself is Windows-only.
    struct Registry {
        held: Mutex<HashSet<String>>,
        released: Condvar,
    }

    fn registry() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| Registry {
            held: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        })
    }

    pub struct InstanceLock {
        name: String,
    }

    impl Drop for InstanceLock {
        fn drop(&mut self) {
            let reg = registry();
            let mut held = reg.held.lock().unwrap_or_else(|e| e.into_inner());
            held.remove(&self.name);
            reg.released.notify_all();
        }
    }

    pub fn acquire(name: &str, policy: AcquirePolicy) -> Result<InstanceLock, AcquireError> {
        let reg = registry();
        let mut held = reg.held.lock().unwrap_or_else(|e| e.into_inner());
        if held.insert(name.to_string()) {
            return Ok(InstanceLock {
                name: name.to_string(),
            });
        }

        let timeout = match policy {
            AcquirePolicy::FailFast => {
                return Err(AcquireError::AlreadyRunning(name.to_string()))
            }
            AcquirePolicy::BoundedWait { timeout } => timeout,
        };

        let deadline = Instant::now() + timeout;
        while held.contains(name) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(AcquireError::Timeout(name.to_string()));
            }
            let (guard, _) = reg
                .released
                .wait_timeout(held, remaining)
                .unwrap_or_else(|e| e.into_inner());
            held = guard;
        }
        held.insert(name.to_string());
        Ok(InstanceLock {
            name: name.to_string(),
        })
    }
}
