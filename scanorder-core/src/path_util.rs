//! String-level path helpers that work on both `/` and `\` separated paths.
//!
//! Batches can come from a picker running on another platform than the one
//! doing the renaming, so these helpers never go through `std::path` and
//! always keep whichever separator the input already uses.

const SEPARATORS: [char; 2] = ['/', '\\'];

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Detect the separator a path uses, falling back to the platform default.
pub fn separator_of(path: &str) -> char {
    path.rfind(SEPARATORS)
        .and_then(|idx| path[idx..].chars().next())
        .unwrap_or(std::path::MAIN_SEPARATOR)
}

/// Strip trailing separators, keeping a bare root like `/` or `C:\` intact.
fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATORS);
    if trimmed.is_empty() {
        // Path was entirely separators ("/" or "\\")
        return &path[..path.len().min(1)];
    }
    if trimmed.ends_with(':') && trimmed.len() < path.len() {
        // Drive root such as "C:\"
        return &path[..=trimmed.len()];
    }
    trimmed
}

/// Parent directory of `path`, or an empty string when there is none.
pub fn dirname(path: &str) -> String {
    let trimmed = trim_trailing_separators(path);
    if trimmed.len() == 1 && trimmed.starts_with(is_separator) {
        return trimmed.to_string();
    }

    match trimmed.rfind(SEPARATORS) {
        // "/file.png" lives in the root
        Some(0) => trimmed[..1].to_string(),
        Some(idx) => {
            let parent = &trimmed[..idx];
            if parent.ends_with(':') {
                // Keep the separator of a drive root: "C:\file.png" -> "C:\"
                trimmed[..=idx].to_string()
            } else {
                parent.to_string()
            }
        },
        None => String::new(),
    }
}

/// Final component of `path`, ignoring trailing separators.
pub fn basename(path: &str) -> String {
    let trimmed = path.trim_end_matches(SEPARATORS);
    match trimmed.rfind(SEPARATORS) {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Join a directory and a file name using the directory's own separator.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    if dir.ends_with(is_separator) {
        return format!("{}{}", dir, name);
    }
    format!("{}{}{}", dir, separator_of(dir), name)
}

/// Text after the last `.` of a file name, empty when there is no dot.
pub fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |idx| &name[idx + 1..])
}
