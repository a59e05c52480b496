use crate::error::{ReorderError, ReorderResult};
use crate::path_util::{basename, dirname, extension, join_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;
use ts_rs::TS;

/// Minimum number of digits in a generated page number
pub const MIN_PAD_WIDTH: usize = 3;
/// Digits in `usize::MAX`; no batch can need more
pub const MAX_PAD_WIDTH: usize = 20;

/// One image file inside a single flat directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// File name used for the extension, falling back to the path when the
    /// collaborator left the name empty.
    fn file_name(&self) -> String {
        if self.name.is_empty() {
            basename(&self.path)
        } else {
            self.name.clone()
        }
    }
}

/// A single source -> destination rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenameOperation {
    pub original_path: String,
    pub new_path: String,
}

impl RenameOperation {
    pub fn new(original_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            new_path: new_path.into(),
        }
    }

    /// True when applying this operation would not move anything
    pub fn is_noop(&self) -> bool {
        self.original_path == self.new_path
    }

    /// Swap source and destination
    pub fn reversed(&self) -> Self {
        Self::new(self.new_path.clone(), self.original_path.clone())
    }
}

/// How wide the zero padded page number in a target name is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadWidth {
    /// `max(3, digits(n))`, so batches of any size keep lexicographic order
    #[default]
    Dynamic,
    /// Exactly this many digits; batches that do not fit are rejected
    Fixed(usize),
}

impl PadWidth {
    /// A fixed width of `1..=MAX_PAD_WIDTH` digits
    pub fn fixed(width: usize) -> ReorderResult<Self> {
        if (1..=MAX_PAD_WIDTH).contains(&width) {
            Ok(Self::Fixed(width))
        } else {
            Err(ReorderError::InvalidPadWidth { width })
        }
    }

    /// Resolve the digit count for a batch of `count` files
    pub fn width_for(self, count: usize) -> ReorderResult<usize> {
        let needed = count.to_string().len();
        match self {
            Self::Dynamic => Ok(needed.max(MIN_PAD_WIDTH)),
            Self::Fixed(width) if width == 0 || width > MAX_PAD_WIDTH => {
                Err(ReorderError::InvalidPadWidth { width })
            },
            Self::Fixed(width) if needed > width => {
                Err(ReorderError::BatchTooLarge { count, width })
            },
            Self::Fixed(width) => Ok(width),
        }
    }
}

impl FromStr for PadWidth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("dynamic") || s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Dynamic);
        }
        match s.parse::<usize>() {
            Ok(width) => Self::fixed(width).map_err(|e| e.to_string()),
            Err(_) => Err(format!(
                "invalid pad width '{}': expected 'dynamic' or a number",
                s
            )),
        }
    }
}

impl fmt::Display for PadWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic => write!(f, "dynamic"),
            Self::Fixed(width) => write!(f, "{}", width),
        }
    }
}

/// An ordered list of renames computed before anything is touched on disk.
///
/// Operation order is execution order, and therefore the order in which
/// successful renames are recorded for undo.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenamePlan {
    pub id: String,
    pub created_at: String,
    pub directory: String,
    pub prefix: String,
    #[ts(type = "number")]
    pub pad_width: usize,
    pub operations: Vec<RenameOperation>,
}

impl RenamePlan {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations that actually move a file
    pub fn changes(&self) -> usize {
        self.operations.iter().filter(|op| !op.is_noop()).count()
    }

    /// `<folder>_reordered` next to the batch's folder
    pub fn sibling_output_dir(&self) -> String {
        join_path(
            &dirname(&self.directory),
            &format!("{}_reordered", basename(&self.directory)),
        )
    }

    /// The same plan with every target name placed in `output_dir`
    #[must_use]
    pub fn rooted_at(&self, output_dir: &str) -> Self {
        let operations = self
            .operations
            .iter()
            .map(|op| {
                RenameOperation::new(
                    op.original_path.clone(),
                    join_path(output_dir, &basename(&op.new_path)),
                )
            })
            .collect();
        Self {
            operations,
            ..self.clone()
        }
    }
}

/// Prefix shared by every target name: the name of the batch's directory.
pub fn folder_prefix(batch: &[FileEntry]) -> String {
    batch
        .first()
        .map(|entry| basename(&dirname(&entry.path)))
        .unwrap_or_default()
}

/// Target file name for the page at zero-based `position`.
pub fn target_name(prefix: &str, position: usize, width: usize, ext: &str) -> String {
    let number = format!("{:0width$}", position + 1, width = width);
    if ext.is_empty() {
        format!("{}_{}", prefix, number)
    } else {
        format!("{}_{}.{}", prefix, number, ext)
    }
}

/// Build the rename plan for an interleaved batch.
///
/// `batch` is the naturally sorted batch before interleaving and is only used
/// to derive the folder prefix. Any two operations resolving to the same
/// target (compared case-insensitively, so the plan is also safe on
/// case-insensitive filesystems) reject the whole plan.
pub fn build_plan(
    interleaved: &[FileEntry],
    batch: &[FileEntry],
    pad: PadWidth,
) -> ReorderResult<RenamePlan> {
    let directory = batch
        .first()
        .or_else(|| interleaved.first())
        .map(|entry| dirname(&entry.path))
        .unwrap_or_default();

    if interleaved.is_empty() {
        return Err(ReorderError::NoSupportedFiles { path: directory });
    }

    let prefix = folder_prefix(if batch.is_empty() { interleaved } else { batch });
    let width = pad.width_for(interleaved.len())?;

    let operations: Vec<RenameOperation> = interleaved
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let name = entry.file_name();
            let file_name = target_name(&prefix, position, width, extension(&name));
            let new_path = join_path(&dirname(&entry.path), &file_name);
            RenameOperation::new(entry.path.clone(), new_path)
        })
        .collect();

    check_operations(&operations)?;

    Ok(RenamePlan {
        id: generate_plan_id(&directory, &operations),
        created_at: chrono::Local::now().to_rfc3339(),
        directory,
        prefix,
        pad_width: width,
        operations,
    })
}

/// Reject operation lists that are not a bijection or whose targets coincide.
///
/// Targets are compared case-insensitively so a plan that is valid here is
/// also valid on case-insensitive filesystems. Plans loaded from disk go
/// through the same check before they are applied.
pub fn check_operations(operations: &[RenameOperation]) -> ReorderResult<()> {
    let mut sources: HashSet<&str> = HashSet::with_capacity(operations.len());
    let mut targets: HashMap<String, &str> = HashMap::with_capacity(operations.len());

    for op in operations {
        if op.original_path.is_empty() {
            return Err(ReorderError::MissingPath {
                name: op.new_path.clone(),
            });
        }
        if !sources.insert(&op.original_path) {
            return Err(ReorderError::DuplicateEntry {
                path: op.original_path.clone(),
            });
        }
        if let Some(first) = targets.insert(op.new_path.to_lowercase(), &op.original_path) {
            return Err(ReorderError::PlanCollision {
                path: op.new_path.clone(),
                first: first.to_string(),
                second: op.original_path.clone(),
            });
        }
    }

    Ok(())
}

fn generate_plan_id(directory: &str, operations: &[RenameOperation]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(directory.as_bytes());
    for op in operations {
        hasher.update(op.original_path.as_bytes());
        hasher.update(b"\0");
        hasher.update(op.new_path.as_bytes());
    }
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    hasher.update(nanos.to_string().as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

pub fn write_plan(plan: &RenamePlan, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create plan file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, plan)?;
    Ok(())
}

pub fn load_plan(path: &Path) -> Result<RenamePlan> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open plan file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse plan file: {}", path.display()))
}
