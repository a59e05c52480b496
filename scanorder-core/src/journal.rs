use anyhow::Result;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only, timestamped log of every rename a batch attempts.
///
/// Logging never decides the outcome of a rename: write errors are reported
/// once on stderr and the journal then goes quiet.
#[derive(Debug, Default)]
pub struct Journal {
    path: Option<PathBuf>,
    file: Option<File>,
}

impl Journal {
    /// A journal that discards everything
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open (or create) the log file at `path` for appending
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file: Some(file),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn log(&mut self, message: &str) {
        if let Some(ref mut file) = self.file {
            let written = writeln!(
                file,
                "[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            )
            .and_then(|()| file.flush());

            if let Err(e) = written {
                eprintln!("Warning: Failed to write log entry: {}", e);
                self.file = None;
            }
        }
    }
}
