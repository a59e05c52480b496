#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod copier;
pub mod error;
pub mod fs;
pub mod interleave;
pub mod interrupt;
pub mod journal;
pub mod lock;
pub mod natural;
pub mod operations;
pub mod output;
pub mod path_util;
pub mod plan;
pub mod preview;
pub mod renamer;
pub mod scan;
pub mod session;

pub use config::Config;
pub use copier::{copy_batch, simulate_copy};
pub use error::{ReorderError, ReorderResult};
pub use fs::{Entry, FileSystem, MemoryFs, RealFs};
pub use interleave::{interleave, interleave_indices};
pub use journal::Journal;
pub use lock::LockFile;
pub use natural::{compare_names, sort_entries};
pub use operations::{
    apply_operation, discard_operation, plan_operation, reorder_operation, status_operation,
    undo_operation, ApplyOutcome, CopyDestination, ReorderOptions,
};
pub use output::{
    ApplyResult, CopyResult, DiscardResult, OutputFormat, OutputFormatter, PlanResult, SavedPlan,
    StatusResult, UndoReport,
};
pub use path_util::{basename, dirname, extension, join_path};
pub use plan::{build_plan, check_operations, FileEntry, PadWidth, RenameOperation, RenamePlan};
pub use preview::{render_plan, write_preview, Preview};
pub use renamer::{simulate, BatchResult, OperationFailure, Renamer, UndoResult};
pub use scan::{collect_batch, DroppedInput, ExtensionFilter, ResolvedBatch};
pub use session::{OperationHistory, Session, SessionState, SessionStore};
