//! `afxw his` - pick a directory from AFxW's folder history and jump to it.

use anyhow::Context;
use clap::{Args, ValueEnum};

use crate::afx::{Afx, OleAfx, Window};
use crate::single_instance::{self, AcquirePolicy};
use crate::ui::{FuzzyPicker, PickError, Picker};

use super::dedup_preserving_order;

#[derive(Args)]
pub struct HisArgs {
    /// Which pane's history to offer
    #[arg(short, long, value_enum, default_value_t = WindowChoice::Both)]
    pub window: WindowChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum WindowChoice {
    Left,
    Right,
    Both,
}

impl WindowChoice {
    fn windows(self) -> Vec<Window> {
        match self {
            WindowChoice::Left => vec![Window::Left],
            WindowChoice::Right => vec![Window::Right],
            WindowChoice::Both => vec![Window::Left, Window::Right],
        }
    }
}

pub fn run(args: HisArgs) -> anyhow::Result<()> {
    let _lock = single_instance::acquire("afxw-his", AcquirePolicy::bounded())?;

    let afx = OleAfx::open().context("could not connect to afxw.obj")?;
    select_and_jump(&afx, &mut FuzzyPicker::new(), &args.window.windows())
}

fn select_and_jump(
    afx: &dyn Afx,
    picker: &mut dyn Picker,
    windows: &[Window],
) -> anyhow::Result<()> {
    let dirs = afx
        .histories(windows)
        .context("could not fetch the folder history")?;
    let dirs = dedup_preserving_order(dirs);
    tracing::debug!(count = dirs.len(), "loaded folder history");
    if dirs.is_empty() {
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

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::afx::testing::MockAfx;
    use crate::ui::testing::MockPicker;

    use super::*;

    #[test]
    fn jumps_to_the_selected_entry() {
        let afx = MockAfx {
            histories_result: vec!["C:\\Windows".to_string(), "C:\\Users".to_string()],
            ..Default::default()
        };
        let mut picker = MockPicker {
            selection: Some(1),
            ..Default::default()
        };

        select_and_jump(&afx, &mut picker, &[Window::Left]).expect("run");
        assert_eq!(afx.changed_to.borrow().as_deref(), Some("C:\\Users"));
    }

    #[test]
    fn aborted_pick_is_a_quiet_no_op() {
        let afx = MockAfx {
            histories_result: vec!["C:\\Windows".to_string()],
            ..Default::default()
        };
        let mut picker = MockPicker::default();

        select_and_jump(&afx, &mut picker, &[Window::Left]).expect("abort is not a failure");
        assert!(afx.changed_to.borrow().is_none());
    }

    #[test]
    fn empty_history_never_opens_the_picker() {
        let afx = MockAfx::default();
        let mut picker = MockPicker {
            selection: Some(0),
            ..Default::default()
        };

        select_and_jump(&afx, &mut picker, &[Window::Left]).expect("run");
        assert_eq!(picker.calls, 0);
        assert!(afx.changed_to.borrow().is_none());
    }

    #[test]
    fn history_failure_propagates() {
        let afx = MockAfx {
            histories_error: Some("histories error"),
            ..Default::default()
        };
        let mut picker = MockPicker::default();

        let err = select_and_jump(&afx, &mut picker, &[Window::Left]).unwrap_err();
        assert!(err.to_string().contains("folder history"));
    }

    #[test]
    fn change_directory_failure_propagates() {
        let afx = MockAfx {
            histories_result: vec!["C:\\Windows".to_string()],
            change_directory_error: Some("excd error"),
            ..Default::default()
        };
        let mut picker = MockPicker {
            selection: Some(0),
            ..Default::default()
        };

        let err = select_and_jump(&afx, &mut picker, &[Window::Left]).unwrap_err();
        assert!(err.to_string().contains("change directory"));
    }

    #[test]
    fn duplicate_entries_collapse_before_the_picker() {
        let afx = MockAfx {
            histories_result: vec![
                "C:\\Users".to_string(),
                "C:\\Users".to_string(),
                "C:\\Projects".to_string(),
            ],
            ..Default::default()
        };
        // Index 1 must land on C:\Projects once the duplicate collapses.
        let mut picker = MockPicker {
            selection: Some(1),
            ..Default::default()
        };

        select_and_jump(&afx, &mut picker, &[Window::Left]).expect("run");
        assert_eq!(afx.changed_to.borrow().as_deref(), Some("C:\\Projects"));
    }

    #[test]
    fn requested_windows_reach_the_session_in_order() {
        let by_window: HashMap<i32, Vec<String>> = [
            (Window::Left.id(), vec!["C:\\Left".to_string()]),
            (Window::Right.id(), vec!["C:\\Right".to_string()]),
        ]
        .into_iter()
        .collect();

        for (windows, expected) in [
            (vec![Window::Left], "C:\\Left"),
            (vec![Window::Right], "C:\\Right"),
            (vec![Window::Left, Window::Right], "C:\\Left"),
        ] {
            let afx = MockAfx {
                histories_by_window: Some(by_window.clone()),
                ..Default::default()
            };
            let mut picker = MockPicker {
                selection: Some(0),
                ..Default::default()
            };

            select_and_jump(&afx, &mut picker, &windows).expect("run");
            assert_eq!(*afx.received_windows.borrow(), windows);
            assert_eq!(afx.changed_to.borrow().as_deref(), Some(expected));
        }
    }

    #[test]
    fn window_choice_maps_to_pane_lists() {
        assert_eq!(WindowChoice::Left.windows(), [Window::Left]);
        assert_eq!(WindowChoice::Right.windows(), [Window::Right]);
        assert_eq!(WindowChoice::Both.windows(), [Window::Left, Window::Right]);
    }
}
