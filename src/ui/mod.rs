//! Terminal front-ends: the fuzzy picker and the launcher menu.

mod menu;
mod picker;

pub use menu::menu;
pub use picker::FuzzyPicker;

use thiserror::Error;

/// Interactive selection over a list of items.
pub trait Picker {
    /// Index of the chosen item.
    fn pick(&mut self, items: &[String]) -> Result<usize, PickError>;
}

#[derive(Debug, Error)]
pub enum PickError {
    /// The user backed out (Esc or Ctrl-C). Callers treat this as a quiet
    /// no-op, never as a failure.
    #[error("selection aborted")]
    Aborted,
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{PickError, Picker};

    /// Picker that answers from a script instead of a terminal.
    #[derive(Default)]
    pub struct MockPicker {
        /// `None` simulates the user backing out.
        pub selection: Option<usize>,
        pub calls: usize,
    }

    impl Picker for MockPicker {
        fn pick(&mut self, _items: &[String]) -> Result<usize, PickError> {
            self.calls += 1;
            self.selection.ok_or(PickError::Aborted)
        }
    }
}
