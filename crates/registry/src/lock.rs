//! Advisory file lock scoped to a project's marker file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// RAII guard for an exclusively-held project lock.
///
/// Backed by `flock(LOCK_EX)` on `<marker>.lock`. The lock is released when
/// the guard is dropped; the OS also releases it if the holding process
/// dies, though the lock file itself is left behind in that case (no
/// staleness detection exists).
///
/// Read-only registry operations deliberately do not take this lock; it
/// exists to bracket multi-step mutating sequences so that two concurrent
/// invocations against the same project serialize rather than race.
pub struct ProjectLock {
    // Held open for the lifetime of the guard; closing the fd unlocks.
    _file: File,
    path: PathBuf,
}

impl ProjectLock {
    /// Acquire the lock, blocking until the current holder releases it.
    pub(crate) fn acquire(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        flock_exclusive(&file)?;
        Ok(Self {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the lock file backing this guard.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for ProjectLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectLock")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: flock is a standard POSIX call; the fd is valid for the
    // lifetime of `file`, which outlives this call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> io::Result<()> {
    // Advisory locking is only wired up on unix hosts.
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn acquire_creates_lock_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".dockhand-project.lock");

        let guard = ProjectLock::acquire(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(guard.path(), path);
    }

    #[cfg(unix)]
    #[test]
    fn second_acquire_blocks_until_release() {
        use std::sync::mpsc;
        use std::time::Duration;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".dockhand-project.lock");

        let guard = ProjectLock::acquire(&path).unwrap();

        let (tx, rx) = mpsc::channel();
        let contender_path = path.clone();
        let handle = std::thread::spawn(move || {
            let _second = ProjectLock::acquire(&contender_path).unwrap();
            tx.send(()).unwrap();
        });

        // While the first guard lives, the contender must not get through.
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

        drop(guard);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();
    }
}
