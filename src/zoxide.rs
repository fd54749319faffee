//! Thin wrapper around the external zoxide frecency database tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};

/// One scored directory from `zoxide query`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub path: String,
    pub score: f64,
}

fn zoxide_binary() -> anyhow::Result<PathBuf> {
    which::which("zoxide").context("zoxide not found. Install it or add it to PATH")
}

/// Run `zoxide query --list --score` and return the entries it reports,
/// highest score first (zoxide's own order).
pub fn query() -> anyhow::Result<Vec<Entry>> {
    let binary = zoxide_binary()?;
    let output = Command::new(binary)
        .args(["query", "--list", "--score"])
        .output()
        .context("could not run zoxide")?;
    if !output.status.success() {
        bail!(
            "zoxide query failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(parse_query_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `score path` lines. Malformed lines are skipped, as are directories
/// that no longer exist.
pub(crate) fn parse_query_output(output: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((score, path)) = line.split_once(' ') else {
            continue;
        };
        let Ok(score) = score.parse::<f64>() else {
            continue;
        };
        // zoxide right-aligns the score column.
        let path = path.trim_start();
        if Path::new(path).is_dir() {
            entries.push(Entry {
                path: path.to_string(),
                score,
            });
        }
    }
    entries
}

/// Serialize paths in the z.sh import format: `path|rank|unix-timestamp`.
pub(crate) fn z_format(paths: &[String], timestamp: i64) -> String {
    let mut out = String::new();
    for path in paths {
        out.push_str(&format!("{path}|1|{timestamp}\n"));
    }
    out
}

/// Hand a z-format payload to `zoxide import --from z --merge`.
pub fn import(payload: &str) -> anyhow::Result<()> {
    let binary = zoxide_binary()?;

    let mut file =
        tempfile::NamedTempFile::new().context("could not create the import scratch file")?;
    file.write_all(payload.as_bytes())
        .context("could not write the import scratch file")?;

    let status = Command::new(binary)
        .args(["import", "--from", "z", "--merge"])
        .arg(file.path())
        .status()
        .context("could not run zoxide import")?;
    if !status.success() {
        bail!("zoxide import failed");
    }
    Ok(())
}
