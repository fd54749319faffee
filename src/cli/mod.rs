//! Command-line surface for the tool family.

pub mod bm;
pub mod his;
pub mod launcher;
pub mod zox;

use std::collections::HashSet;

use clap::{Parser, Subcommand};

/// Process exit codes shared by every subcommand.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    /// An external tool (zoxide, a menu command) is missing.
    pub const TOOL_MISSING: i32 = 2;
    /// The previous instance did not release the lock in time.
    pub const LOCK_TIMEOUT: i32 = 3;
}

#[derive(Parser)]
#[command(
    name = "afxw",
    version,
    about = "Directory-jumping companions for the AFxW file manager"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Jump to a directory from AFxW's folder history
    His(his::HisArgs),
    /// Jump to a bookmarked directory, or add one
    Bm(bm::BmArgs),
    /// Jump via the zoxide frecency database
    Zox(zox::ZoxArgs),
    /// Interactive menu over the other tools (the default)
    Launcher,
}

/// Drop repeated entries, keeping the first occurrence's position.
pub(crate) fn dedup_preserving_order(dirs: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    dirs.into_iter().filter(|dir| seen.insert(dir.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let dirs = vec![
            "C:\\Users".to_string(),
            "C:\\Projects".to_string(),
            "C:\\Users".to_string(),
            "C:\\Windows".to_string(),
        ];
        assert_eq!(
            dedup_preserving_order(dirs),
            ["C:\\Users", "C:\\Projects", "C:\\Windows"]
        );
    }

    #[test]
    fn dedup_of_empty_is_empty() {
        assert!(dedup_preserving_order(Vec::new()).is_empty());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["afxw", "his", "--window", "left"]);
        assert!(matches!(cli.command, Some(Commands::His(_))));

        let cli = Cli::parse_from(["afxw", "--verbose"]);
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }
}
