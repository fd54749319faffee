//! Session layer for the AFxW automation object.
//!
//! AFxW (a two-pane Windows file manager) exposes `afxw.obj` over COM. This
//! module owns the session lifecycle around that object and the three remote
//! operations the tools need: reading the folder history, changing the
//! active directory, and reading the active path. Everything user-facing
//! goes through the [`Afx`] trait so the CLI flows can be exercised against
//! a scripted stand-in.

use thiserror::Error;

#[cfg(windows)]
mod session;
#[cfg(windows)]
pub use session::OleAfx;

/// AFxW pane identifiers as the automation object numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Left,
    Right,
}

impl Window {
    pub(crate) fn id(self) -> i32 {
        match self {
            Window::Left => 0,
            Window::Right => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum AfxError {
    /// Initializing the COM subsystem on this thread failed.
    #[error("COM initialization failed: {0}")]
    Initialize(String),
    /// `afxw.obj` could not be resolved or instantiated, usually because
    /// AFxW is not running.
    #[error("could not create the afxw.obj automation object: {0}")]
    CreateInstance(String),
    /// The object exists but does not expose the dispatch interface.
    #[error("could not obtain the afxw.obj dispatch interface: {0}")]
    QueryInterface(String),
    /// A remote call on an open session failed.
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },
    /// Building without the automation backend (non-Windows hosts).
    #[error("AFxW automation requires Windows")]
    Unsupported,
}

/// One open session with AFxW.
pub trait Afx {
    /// History entries for each requested pane, in pane-then-index order.
    /// Entries are not deduplicated here; callers decide.
    fn histories(&self, windows: &[Window]) -> Result<Vec<String>, AfxError>;

    /// Point AFxW's active pane at `path`.
    fn change_directory(&self, path: &str) -> Result<(), AfxError>;

    /// The directory shown in whichever pane has focus.
    fn active_path(&self) -> Result<String, AfxError>;
}

/// AFxW wants directory arguments with a trailing backslash.
pub(crate) fn ensure_trailing_backslash(path: &str) -> String {
    if path.ends_with('\\') {
        path.to_string()
    } else {
        format!("{path}\\")
    }
}

/// The internal command AFxW's `Exec` method runs to change directory.
pub(crate) fn excd_command(path: &str) -> String {
    format!("&EXCD -P\"{}\"", ensure_trailing_backslash(path))
}

/// Walk the panes in order, asking for each one's entry count and then each
/// entry by index. Any failure aborts the whole collection.
pub(crate) fn collect_histories<E>(
    windows: &[Window],
    mut count: impl FnMut(Window) -> Result<i32, E>,
    mut entry: impl FnMut(Window, i32) -> Result<String, E>,
) -> Result<Vec<String>, E> {
    let mut dirs = Vec::new();
    for &win in windows {
        let total = count(win)?;
        for index in 0..total {
            dirs.push(entry(win, index)?);
        }
    }
    Ok(dirs)
}

#[cfg(not(windows))]
pub struct OleAfx;

#[cfg(not(windows))]
impl OleAfx {
    /// The live session only exists on Windows; other hosts get a uniform
    /// error so the CLI layer builds everywhere.
    pub fn open() -> Result<Self, AfxError> {
        Err(AfxError::Unsupported)
    }
}

#[cfg(not(windows))]
impl Afx for OleAfx {
    fn histories(&self, _windows: &[Window]) -> Result<Vec<String>, AfxError> {
        Err(AfxError::Unsupported)
    }

    fn change_directory(&self, _path: &str) -> Result<(), AfxError> {
        Err(AfxError::Unsupported)
    }

    fn active_path(&self) -> Result<String, AfxError> {
        Err(AfxError::Unsupported)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_backslash_is_appended_once() {
        assert_eq!(ensure_trailing_backslash("C:\\Users\\Test"), "C:\\Users\\Test\\");
        assert_eq!(ensure_trailing_backslash("C:\\Users\\Test\\"), "C:\\Users\\Test\\");
        assert_eq!(ensure_trailing_backslash("C:\\"), "C:\\");
    }

    #[test]
    fn excd_command_is_trailing_separator_idempotent() {
        let bare = excd_command("C:\\Users\\Test");
        let trailing = excd_command("C:\\Users\\Test\\");
        assert_eq!(bare, trailing);
        assert_eq!(bare, "&EXCD -P\"C:\\Users\\Test\\\"");
    }

    #[test]
    fn window_ids_match_afxw_numbering() {
        assert_eq!(Window::Left.id(), 0);
        assert_eq!(Window::Right.id(), 1);
    }

    #[test]
    fn histories_are_collected_in_window_then_index_order() {
        let dirs = collect_histories(
            &[Window::Right, Window::Left],
            |_| Ok::<_, AfxError>(2),
            |win, index| Ok(format!("{win:?}-{index}")),
        )
        .expect("collection");
        assert_eq!(dirs, ["Right-0", "Right-1", "Left-0", "Left-1"]);
    }

    #[test]
    fn histories_keep_duplicates() {
        let dirs = collect_histories(
            &[Window::Left, Window::Right],
            |_| Ok::<_, AfxError>(1),
            |_, _| Ok("C:\\Same".to_string()),
        )
        .expect("collection");
        assert_eq!(dirs, ["C:\\Same", "C:\\Same"]);
    }

    #[test]
    fn history_failure_yields_no_partial_result() {
        let result = collect_histories(
            &[Window::Left, Window::Right],
            |win| {
                if win == Window::Right {
                    Err(AfxError::Remote {
                        operation: "HisDirCount",
                        message: "boom".to_string(),
                    })
                } else {
                    Ok(1)
                }
            },
            |_, _| Ok("C:\\Left".to_string()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_window_list_collects_nothing() {
        let dirs = collect_histories(&[], |_| Ok::<_, AfxError>(5), |_, _| Ok(String::new()))
            .expect("collection");
        assert!(dirs.is_empty());
    }

    #[test]
    fn open_errors_name_the_failed_step() {
        assert!(AfxError::Initialize("denied".into())
            .to_string()
            .contains("COM initialization"));
        assert!(AfxError::CreateInstance("no server".into())
            .to_string()
            .contains("create"));
        assert!(AfxError::QueryInterface("no dispatch".into())
            .to_string()
            .contains("dispatch interface"));
    }
}
