//! `afxw bm` - pick a bookmarked directory and jump to it, or add one.

use std::path::Path;

use anyhow::Context;
use clap::Args;

use crate::afx::{Afx, OleAfx};
use crate::bookmark;
use crate::ui::{FuzzyPicker, PickError, Picker};

#[derive(Args)]
pub struct BmArgs {
    /// Add PATH to the bookmarks instead of picking one. With no PATH the
    /// directory AFxW is showing (or the current directory) is added.
    #[arg(
        short,
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub add: Option<String>,
}

pub fn run(args: BmArgs) -> anyhow::Result<()> {
    if let Some(target) = args.add {
        return add(target);
    }

    let store = bookmark::default_path()?;
    let afx = OleAfx::open().context("could not connect to afxw.obj")?;
    select_and_jump(&afx, &mut FuzzyPicker::new(), &store)
}

fn add(mut target: String) -> anyhow::Result<()> {
    // Prefer the pane AFxW is showing over the shell's working directory,
    // but an unreachable AFxW is not an error here.
    if target.is_empty() || target == "." {
        if let Ok(afx) = OleAfx::open() {
            if let Ok(path) = afx.active_path() {
                if !path.is_empty() {
                    target = path;
                }
            }
        }
        if target.is_empty() {
            target = ".".to_string();
        }
    }

    let absolute = std::path::absolute(&target)
        .with_context(|| format!("could not resolve the path to add: {target}"))?;
    let store = bookmark::default_path()?;
    bookmark::add(&store, &absolute.to_string_lossy())?;
    println!("Added bookmark: {}", absolute.display());
    Ok(())
}

fn select_and_jump(afx: &dyn Afx, picker: &mut dyn Picker, store: &Path) -> anyhow::Result<()> {
    let dirs = bookmark::load(store)?;
    if dirs.is_empty() {
        println!("No bookmarks yet. Add one with 'afxw bm --add'.");
        return Ok(());
    }

    let idx = match picker.pick(&dirs) {
        Ok(idx) => idx,
        Err(PickError::Aborted) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    afx.change_directory(&dirs[idx])
        .context("could not change directory")?;
    Ok(())
}
