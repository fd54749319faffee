//! Launcher configuration.
//!
//! TOML file with `[[menu]]` entries and a `[settings]` table, looked up in
//! the user's config directory first and next to the executable second. When
//! neither exists a default file is written so there is something to edit.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Extra directory searched for tool executables before the exe
    /// directory and PATH.
    #[serde(default)]
    pub tool_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        let entry = |name: &str, description: &str, args: &[&str]| MenuItem {
            name: name.to_string(),
            description: description.to_string(),
            command: "afxw.exe".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        Self {
            menu: vec![
                entry(
                    "Folder history",
                    "Pick from AFxW's folder history and jump",
                    &["his"],
                ),
                entry(
                    "zoxide",
                    "Pick from the zoxide frecency database and jump",
                    &["zox"],
                ),
                entry("Bookmarks", "Pick a bookmarked directory and jump", &["bm"]),
                entry(
                    "Add bookmark",
                    "Bookmark the directory AFxW is showing",
                    &["bm", "--add"],
                ),
            ],
            settings: Settings::default(),
        }
    }
}

/// Load the first config file found, or fall back to the default config
/// (writing it out for next time; a failed write is only a warning).
pub fn load() -> anyhow::Result<Config> {
    let candidates = candidate_paths();
    for path in &candidates {
        if path.exists() {
            return load_from(path);
        }
    }

    let cfg = Config::default();
    if let Some(target) = candidates.first() {
        if let Err(e) = write_default(target, &cfg) {
            tracing::warn!("could not write the default config: {e:#}");
        }
    }
    Ok(cfg)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(
            home.join(".config")
                .join("afxw-launcher")
                .join("config.toml"),
        );
    }
    paths.push(executable_dir().join("config.toml"));
    paths
}

pub fn load_from(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read the config file {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("could not parse the config file {}", path.display()))
}

fn write_default(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display()))?;
    }
    let text = toml::to_string_pretty(cfg).context("could not serialize the default config")?;
    std::fs::write(path, text)
        .with_context(|| format!("could not write {}", path.display()))?;
    println!("Created a default config at {}", path.display());
    Ok(())
}

impl Config {
    /// Resolve a menu command: an absolute path is taken as-is, otherwise
    /// `tool_dir`, the executable's directory, and finally PATH are searched.
    pub fn find_command(&self, command: &str) -> anyhow::Result<PathBuf> {
        let candidate = Path::new(command);
        if candidate.is_absolute() {
            if candidate.exists() {
                return Ok(candidate.to_path_buf());
            }
            bail!("command not found: {command}");
        }

        let mut search_dirs = Vec::new();
        if !self.settings.tool_dir.is_empty() {
            search_dirs.push(PathBuf::from(&self.settings.tool_dir));
        }
        search_dirs.push(executable_dir());

        for dir in search_dirs {
            let full = dir.join(command);
            if full.exists() {
                return Ok(full);
            }
        }

        which::which(command).with_context(|| format!("command not found: {command}"))
    }
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
