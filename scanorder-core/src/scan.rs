use crate::error::{ReorderError, ReorderResult};
use crate::fs::FileSystem;
use crate::path_util::{basename, dirname, extension, join_path};
use crate::plan::FileEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image extensions accepted into a batch, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "svg", "heif", "heic", "raw", "cr2",
    "nef", "arw", "dng", "avif", "jxr", "jp2", "j2k", "psd",
];

/// Extension filter: the built-in list plus any configured extras
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    extra: Vec<String>,
}

impl ExtensionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn accepts(&self, name: &str) -> bool {
        let ext = extension(name).to_lowercase();
        if ext.is_empty() {
            return false;
        }
        SUPPORTED_EXTENSIONS.contains(&ext.as_str()) || self.extra.iter().any(|e| *e == ext)
    }
}

/// What the user handed over: loose files or a whole folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroppedInput {
    Files(Vec<String>),
    Folder(String),
}

impl DroppedInput {
    /// Classify raw paths: a single directory is a folder, anything else is files
    pub fn classify<F>(paths: Vec<String>, is_dir: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if paths.len() == 1 && is_dir(&paths[0]) {
            let mut paths = paths;
            return Self::Folder(paths.remove(0));
        }
        Self::Files(paths)
    }
}

/// List a directory and keep the supported image files.
///
/// Fails closed: an unreadable directory or one without a single supported
/// file aborts before anything is renamed.
pub fn collect_batch<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &str,
    filter: &ExtensionFilter,
) -> ReorderResult<Vec<FileEntry>> {
    let entries = fs
        .list_directory(Path::new(dir))
        .map_err(|source| ReorderError::DirectoryRead {
            path: dir.to_string(),
            source,
        })?;

    let batch: Vec<FileEntry> = entries
        .into_iter()
        .filter(|entry| entry.is_file && filter.accepts(&entry.name))
        .map(|entry| {
            let path = join_path(dir, &entry.name);
            FileEntry::new(entry.name, path)
        })
        .collect();

    if batch.is_empty() {
        return Err(ReorderError::NoSupportedFiles {
            path: dir.to_string(),
        });
    }

    Ok(batch)
}

/// Split entries into a usable batch and the ones that lack a path.
///
/// Entries without a path are excluded rather than failing the batch.
pub fn validate_entries(entries: Vec<FileEntry>) -> (Vec<FileEntry>, Vec<ReorderError>) {
    let mut valid = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for mut entry in entries {
        if entry.path.trim().is_empty() {
            skipped.push(ReorderError::MissingPath { name: entry.name });
            continue;
        }
        if entry.name.is_empty() {
            entry.name = basename(&entry.path);
        }
        valid.push(entry);
    }

    (valid, skipped)
}

/// A batch resolved from dropped input, with any entries that were excluded
#[derive(Debug)]
pub struct ResolvedBatch {
    pub directory: String,
    pub entries: Vec<FileEntry>,
    pub skipped: Vec<ReorderError>,
}

/// Resolve dropped input into a single-directory batch.
pub fn resolve_input<F: FileSystem + ?Sized>(
    fs: &F,
    input: DroppedInput,
    filter: &ExtensionFilter,
) -> ReorderResult<ResolvedBatch> {
    match input {
        DroppedInput::Folder(dir) => {
            let entries = collect_batch(fs, &dir, filter)?;
            Ok(ResolvedBatch {
                directory: dir,
                entries,
                skipped: Vec::new(),
            })
        },
        DroppedInput::Files(paths) => {
            let entries: Vec<FileEntry> = paths
                .into_iter()
                .map(|path| FileEntry::new(basename(&path), path))
                .collect();
            let (valid, mut skipped) = validate_entries(entries);

            let mut batch = Vec::with_capacity(valid.len());
            for entry in valid {
                if !filter.accepts(&entry.name) {
                    skipped.push(ReorderError::UnsupportedFile { path: entry.path });
                } else if !fs.exists(&entry.path) {
                    skipped.push(ReorderError::MissingPath { name: entry.path });
                } else {
                    batch.push(entry);
                }
            }

            let directory = batch
                .first()
                .map(|entry| dirname(&entry.path))
                .unwrap_or_default();

            if let Some(other) = batch.iter().find(|e| dirname(&e.path) != directory) {
                return Err(ReorderError::MixedDirectories {
                    first: directory,
                    second: dirname(&other.path),
                });
            }

            if batch.is_empty() {
                return Err(ReorderError::NoSupportedFiles { path: directory });
            }

            Ok(ResolvedBatch {
                directory,
                entries: batch,
                skipped,
            })
        },
    }
}
