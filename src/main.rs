//! afxw-tools - directory-jumping companions for the AFxW file manager.
//!
//! Every tool talks to a running AFxW instance through its `afxw.obj` COM
//! automation object:
//! - `afxw his` jumps via AFxW's own folder history
//! - `afxw bm` jumps via a bookmark file (and maintains it)
//! - `afxw zox` jumps via the zoxide frecency database
//! - `afxw launcher` is a terminal menu over the other three (the default)

mod afx;
mod bookmark;
mod cli;
mod config;
mod logging;
mod single_instance;
mod ui;
mod zoxide;

use std::io::IsTerminal;

use clap::Parser;

use cli::{exit_codes, Cli, Commands};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return exit_codes::UNEXPECTED_FAILURE;
    }

    let result = match cli.command {
        Some(Commands::His(args)) => cli::his::run(args),
        Some(Commands::Bm(args)) => cli::bm::run(args),
        Some(Commands::Zox(args)) => cli::zox::run(args),
        Some(Commands::Launcher) | None => cli::launcher::run(),
    };

    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            pause_before_exit();
            categorize_error(&e)
        }
    }
}

/// Classify an error into its exit code.
fn categorize_error(e: &anyhow::Error) -> i32 {
    if let Some(acquire) = e.downcast_ref::<single_instance::AcquireError>() {
        return match acquire {
            single_instance::AcquireError::Timeout(_) => exit_codes::LOCK_TIMEOUT,
            _ => exit_codes::UNEXPECTED_FAILURE,
        };
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("not found") || msg.contains("not installed") {
        exit_codes::TOOL_MISSING
    } else {
        exit_codes::UNEXPECTED_FAILURE
    }
}

/// The tools usually run in a console window AFxW spawned just for them;
/// keep it open long enough to read the error.
fn pause_before_exit() {
    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        return;
    }
    eprintln!("Press Enter to close...");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}
