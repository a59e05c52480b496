//! Natural ordering of file names.
//!
//! Names are split into alternating runs of digits and non-digits, so that
//! `img2.png` sorts before `img10.png`. Digit runs compare by value, text
//! runs compare case-insensitively.

use crate::plan::FileEntry;
use std::cmp::Ordering;

/// A maximal run of either digits or non-digits within a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Chunk<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Chunk::Digits(s) | Chunk::Text(s) => s,
        }
    }
}

/// Split a name into alternating digit / non-digit chunks.
pub fn chunks(name: &str) -> Vec<Chunk<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (idx, c) in name.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                result.push(make_chunk(&name[start..idx], prev));
                start = idx;
            },
            _ => {},
        }
        in_digits = Some(is_digit);
    }

    if let Some(prev) = in_digits {
        result.push(make_chunk(&name[start..], prev));
    }

    result
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

/// Compare two digit runs by numeric value without parsing into an integer,
/// so runs longer than `u128` still order correctly.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    let a = a.chars().flat_map(char::to_lowercase);
    let b = b.chars().flat_map(char::to_lowercase);
    a.cmp(b)
}

/// Natural comparison of two file names.
///
/// An empty name sorts before any non-empty name. When every compared chunk
/// is equal the name with fewer chunks sorts first, and names that still tie
/// (`a010` vs `a10`) compare equal so a stable sort keeps their input order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {},
    }

    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (x, y) in a_chunks.iter().zip(b_chunks.iter()) {
        let ordering = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => compare_numeric(x, y),
            _ => compare_text(x.as_str(), y.as_str()),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

/// Sort a batch of entries into natural name order.
///
/// The sort is stable: entries whose names compare equal keep the order
/// they were supplied in.
pub fn sort_entries(mut entries: Vec<FileEntry>) -> Vec<FileEntry> {
    entries.sort_by(|a, b| compare_names(&a.name, &b.name));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> FileEntry {
        FileEntry::new(name, format!("/scans/{}", name))
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_chunks() {
        assert_eq!(
            chunks("img10b"),
            vec![Chunk::Text("img"), Chunk::Digits("10"), Chunk::Text("b")]
        );
        assert_eq!(chunks("007"), vec![Chunk::Digits("007")]);
        assert!(chunks("").is_empty());
        assert_eq!(
            chunks("scan_01.tif"),
            vec![
                Chunk::Text("scan_"),
                Chunk::Digits("01"),
                Chunk::Text(".tif")
            ]
        );
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert_eq!(compare_names("img2.png", "img10.png"), Ordering::Less);
        assert_eq!(compare_names("img010", "img10"), Ordering::Equal);
        assert_eq!(compare_names("p9", "p0010"), Ordering::Less);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert_eq!(compare_names("IMG1.png", "img1.png"), Ordering::Equal);
        assert_eq!(compare_names("Bravo", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_fewer_chunks_first() {
        assert_eq!(compare_names("a2", "a2b"), Ordering::Less);
        assert_eq!(compare_names("a", "a2"), Ordering::Less);
    }

    #[test]
    fn test_empty_names_first() {
        assert_eq!(compare_names("", "a"), Ordering::Less);
        assert_eq!(compare_names("a", ""), Ordering::Greater);
        assert_eq!(compare_names("", ""), Ordering::Equal);
    }

    #[test]
    fn test_very_long_digit_runs() {
        let big = "9".repeat(60);
        let bigger = format!("1{}", "0".repeat(60));
        assert_eq!(compare_names(&big, &bigger), Ordering::Less);
    }

    #[test]
    fn test_sort_examples() {
        let sorted = sort_entries(vec![entry("img2.png"), entry("img10.png"), entry("img1.png")]);
        assert_eq!(names(&sorted), vec!["img1.png", "img2.png", "img10.png"]);

        let sorted = sort_entries(vec![entry("a"), entry("a2"), entry("a10"), entry("a2b")]);
        assert_eq!(names(&sorted), vec!["a", "a2", "a2b", "a10"]);
    }

    #[test]
    fn test_equal_names_keep_input_order() {
        let sorted = sort_entries(vec![
            FileEntry::new("", "/scans/first"),
            entry("b"),
            FileEntry::new("", "/scans/second"),
        ]);
        let paths: Vec<&str> = sorted.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/scans/first", "/scans/second", "/scans/b"]);
    }
}
