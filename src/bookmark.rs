//! Append-only bookmark store, one directory per line.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// `bookmarks.txt` next to the executable, like the rest of the tool files.
pub fn default_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("could not locate the running executable")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join("bookmarks.txt"))
}

/// Load bookmarks in file order, first occurrence wins. A missing file is an
/// empty store, not an error.
pub fn load(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).context("could not read the bookmark file"),
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if seen.insert(line.to_string()) {
            entries.push(line.to_string());
        }
    }
    Ok(entries)
}

/// Append `item` unless an equal entry is already stored. Windows paths
/// compare case-insensitively, so `C:\Tools` and `c:\tools` are one entry.
pub fn add(path: &Path, item: &str) -> anyhow::Result<()> {
    let item = normalize(item);

    let existing = load(path)?;
    if existing.iter().any(|line| line.eq_ignore_ascii_case(&item)) {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("could not open the bookmark file for appending")?;
    writeln!(file, "{item}").context("could not write to the bookmark file")?;
    Ok(())
}

/// Trim a trailing separator so the same directory always stores as the same
/// text. Drive roots like `C:\` keep theirs.
pub(crate) fn normalize(item: &str) -> String {
    let trimmed = item.trim();
    let stripped = trimmed.trim_end_matches(['\\', '/']);
    if stripped.is_empty() || stripped.ends_with(':') {
        trimmed.to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = load(&dir.path().join("bookmarks.txt")).expect("load");
        assert!(entries.is_empty());
    }

    #[test]
    fn load_skips_blanks_and_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bookmarks.txt");
        std::fs::write(&path, "C:\\Tools\n\n  \nC:\\Projects\nC:\\Tools\n").expect("write");

        let entries = load(&path).expect("load");
        assert_eq!(entries, ["C:\\Tools", "C:\\Projects"]);
    }

    #[test]
    fn add_creates_and_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bookmarks.txt");

        add(&path, "C:\\Tools").expect("first add");
        add(&path, "C:\\Projects").expect("second add");

        let entries = load(&path).expect("load");
        assert_eq!(entries, ["C:\\Tools", "C:\\Projects"]);
    }

    #[test]
    fn add_ignores_case_insensitive_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bookmarks.txt");

        add(&path, "C:\\Tools").expect("first add");
        add(&path, "c:\\tools").expect("duplicate add");

        let entries = load(&path).expect("load");
        assert_eq!(entries, ["C:\\Tools"]);
    }

    #[test]
    fn add_trims_the_trailing_separator() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bookmarks.txt");

        add(&path, "C:\\Tools\\").expect("add");
        add(&path, "C:\\Tools").expect("duplicate add");

        let entries = load(&path).expect("load");
        assert_eq!(entries, ["C:\\Tools"]);
    }

    #[test]
    fn normalize_keeps_drive_roots() {
        assert_eq!(normalize("C:\\"), "C:\\");
        assert_eq!(normalize("C:\\Users\\"), "C:\\Users");
        assert_eq!(normalize("  C:\\Users  "), "C:\\Users");
    }
}
