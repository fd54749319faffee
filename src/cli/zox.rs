//! `afxw zox` - jump via the zoxide frecency database, or feed AFxW's
//! folder history into it.

use anyhow::Context;
use chrono::Utc;
use clap::Args;

use crate::afx::{Afx, OleAfx, Window};
use crate::single_instance::{self, AcquirePolicy};
use crate::ui::{FuzzyPicker, PickError, Picker};
use crate::zoxide;

use super::dedup_preserving_order;

#[derive(Args)]
pub struct ZoxArgs {
    /// Import AFxW's folder history into the zoxide database
    #[arg(short, long)]
    pub import_history: bool,
}

pub fn run(args: ZoxArgs) -> anyhow::Result<()> {
    let _lock = single_instance::acquire("afxw-zox", AcquirePolicy::bounded())?;

    let afx = OleAfx::open().context("could not connect to afxw.obj")?;
    if args.import_history {
        return import_history(&afx);
    }
    select_and_jump(&afx, &mut FuzzyPicker::new(), zoxide::query)
}

fn select_and_jump(
    afx: &dyn Afx,
    picker: &mut dyn Picker,
    query: impl FnOnce() -> anyhow::Result<Vec<zoxide::Entry>>,
) -> anyhow::Result<()> {
    let entries = query().context("could not query the zoxide database")?;
    if entries.is_empty() {
        println!("The zoxide database has no directories yet.");
        println!("Move around in a terminal to build it up, then try again.");
        return Ok(());
    }

    let paths: Vec<String> = entries.into_iter().map(|entry| entry.path).collect();
    let idx = match picker.pick(&paths) {
        Ok(idx) => idx,
        Err(PickError::Aborted) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    afx.change_directory(&paths[idx])
        .context("could not change directory")?;
    Ok(())
}

fn import_history(afx: &dyn Afx) -> anyhow::Result<()> {
    let dirs = afx
        .histories(&[Window::Left, Window::Right])
        .context("could not fetch the folder history")?;
    let dirs = dedup_preserving_order(dirs);
    if dirs.is_empty() {
        println!("No history to import.");
        return Ok(());
    }

    let payload = zoxide::z_format(&dirs, Utc::now().timestamp());
    zoxide::import(&payload)?;
    println!("Imported {} history entries into zoxide.", dirs.len());
    Ok(())
}
