use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

const LOCK_FILE_NAME: &str = "scanorder.lock";
const STALE_LOCK_TIMEOUT_SECS: u64 = 300;

/// Exclusive hold on a state directory for the length of one batch.
///
/// The lock file contains `pid:timestamp`. A lock left behind by a process
/// that is gone, or one older than five minutes, is taken over.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    pid: u32,
    timestamp: u64,
}

impl LockFile {
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let lock_path = state_dir.join(LOCK_FILE_NAME);

        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path)
                .with_context(|| format!("Failed to read lock file: {}", lock_path.display()))?;

            match parse_lock(&content) {
                Some((pid, timestamp))
                    if now_secs().saturating_sub(timestamp) <= STALE_LOCK_TIMEOUT_SECS
                        && is_process_running(pid) =>
                {
                    return Err(anyhow!(
                        "Another scanorder process is already running (PID: {}). \
                        If this is incorrect, remove the lock file at: {}",
                        pid,
                        lock_path.display()
                    ));
                },
                _ => {
                    // Stale, orphaned or unreadable
                    fs::remove_file(&lock_path).with_context(|| {
                        format!("Failed to remove stale lock file: {}", lock_path.display())
                    })?;
                },
            }
        }

        fs::create_dir_all(state_dir).with_context(|| {
            format!("Failed to create state directory: {}", state_dir.display())
        })?;

        let pid = process::id();
        let timestamp = now_secs();

        // create_new so two processes racing past the check cannot both win
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;
        write!(file, "{}:{}", pid, timestamp).context("Failed to write lock file")?;

        Ok(Self {
            path: lock_path,
            pid,
            timestamp,
        })
    }

    /// Remove the lock file if it is still ours
    pub fn release(self) -> Result<()> {
        self.remove_if_owned()
    }

    fn remove_if_owned(&self) -> Result<()> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Ok(());
        };
        if parse_lock(&content) == Some((self.pid, self.timestamp)) {
            fs::remove_file(&self.path).context("Failed to remove lock file")?;
        }
        Ok(())
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = self.remove_if_owned();
    }
}

fn parse_lock(content: &str) -> Option<(u32, u64)> {
    let (pid, timestamp) = content.trim().split_once(':')?;
    Some((pid.parse().ok()?, timestamp.parse().ok()?))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 only checks that the process exists
    #[allow(clippy::cast_possible_wrap)]
    unsafe {
        libc::kill(pid as libc::pid_t, 0) == 0
    }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winnt::PROCESS_QUERY_INFORMATION;

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
        if handle.is_null() {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn is_process_running(_pid: u32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state_dir(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join(".scanorder")
    }

    #[test]
    fn test_acquire_and_release() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);

        let lock = LockFile::acquire(&dir).unwrap();
        assert!(dir.join(LOCK_FILE_NAME).exists());
        assert_eq!(lock.pid, process::id());

        lock.release().unwrap();
        assert!(!dir.join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);

        let _held = LockFile::acquire(&dir).unwrap();
        let err = LockFile::acquire(&dir).unwrap_err();
        assert!(err.to_string().contains("already running"));
    }

    #[test]
    fn test_stale_lock_is_taken_over() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);
        fs::create_dir_all(&dir).unwrap();

        // Our own pid is alive, so only the age makes this lock stale
        let old = now_secs() - (STALE_LOCK_TIMEOUT_SECS + 100);
        fs::write(dir.join(LOCK_FILE_NAME), format!("{}:{}", process::id(), old)).unwrap();

        let lock = LockFile::acquire(&dir).unwrap();
        assert_eq!(lock.pid, process::id());
        assert!(lock.timestamp > old);
    }

    #[test]
    fn test_orphaned_lock_is_taken_over() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);
        fs::create_dir_all(&dir).unwrap();

        let recent = now_secs() - 10;
        fs::write(dir.join(LOCK_FILE_NAME), format!("999999:{}", recent)).unwrap();

        assert!(LockFile::acquire(&dir).is_ok());
    }

    #[test]
    fn test_malformed_lock_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(LOCK_FILE_NAME), "garbage").unwrap();

        let lock = LockFile::acquire(&dir).unwrap();
        let content = fs::read_to_string(dir.join(LOCK_FILE_NAME)).unwrap();
        assert_eq!(parse_lock(&content), Some((lock.pid, lock.timestamp)));
    }

    #[test]
    fn test_drop_removes_lock() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);

        {
            let _lock = LockFile::acquire(&dir).unwrap();
            assert!(dir.join(LOCK_FILE_NAME).exists());
        }
        assert!(!dir.join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_release_leaves_foreign_lock() {
        let temp_dir = TempDir::new().unwrap();
        let dir = state_dir(&temp_dir);

        let lock = LockFile::acquire(&dir).unwrap();
        fs::write(dir.join(LOCK_FILE_NAME), "1:1").unwrap();
        lock.release().unwrap();

        assert!(dir.join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_parse_lock() {
        assert_eq!(parse_lock("42:1700000000\n"), Some((42, 1_700_000_000)));
        assert_eq!(parse_lock("42"), None);
        assert_eq!(parse_lock("x:1"), None);
    }

    #[test]
    fn test_process_running_detection() {
        assert!(is_process_running(process::id()));
        assert!(!is_process_running(999_999));
    }
}
