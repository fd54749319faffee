//! `afxw launcher` - terminal menu over the rest of the tool family.

use std::process::Command;

use anyhow::{bail, Context};

use crate::config::{self, Config, MenuItem};
use crate::single_instance::{self, AcquireError, AcquirePolicy};
use crate::ui;

pub fn run() -> anyhow::Result<()> {
    // A second launcher is just the user double-launching; leave quietly.
    let _lock = match single_instance::acquire("afxw-launcher", AcquirePolicy::FailFast) {
        Ok(lock) => lock,
        Err(AcquireError::AlreadyRunning(_)) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let cfg = config::load().context("could not load the launcher config")?;
    if cfg.menu.is_empty() {
        bail!("the launcher menu is empty; add [[menu]] entries to the config");
    }

    let Some(choice) = ui::menu(&cfg.menu).context("could not show the launcher menu")? else {
        return Ok(());
    };
    execute(&cfg, &cfg.menu[choice])
}

fn execute(cfg: &Config, item: &MenuItem) -> anyhow::Result<()> {
    let program = cfg.find_command(&item.command)?;
    tracing::debug!(command = %program.display(), "launching menu selection");

    let status = Command::new(&program)
        .args(&item.args)
        .status()
        .with_context(|| format!("could not launch {}", program.display()))?;
    if !status.success() {
        bail!("{} exited with {status}", item.command);
    }
    Ok(())
}
