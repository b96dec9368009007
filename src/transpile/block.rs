//! Synthesized function block tracking
//!
//! Labels become shell functions. C-shell has no syntax that ends a label's
//! body, so a block stays open until the next label opens or the input ends.

/// Whether a synthesized function body is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Closed,
    Open,
}

/// Per-conversion state machine for label function blocks
#[derive(Debug, Clone, Default)]
pub struct FunctionBlockTracker {
    state: BlockState,
}

impl FunctionBlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == BlockState::Open
    }

    /// Open a function block for `label`
    ///
    /// Returns the text to emit: the closing brace and a blank separator
    /// line if a previous block was open, then the function header.
    pub fn open_label(&mut self, label: &str) -> String {
        let mut out = String::new();
        if self.is_open() {
            out.push_str("}\n\n");
        }
        out.push_str(label);
        out.push_str("() {");
        self.state = BlockState::Open;
        out
    }

    /// Close the open block at end of input
    ///
    /// Returns the closing line exactly once, and `None` if nothing was open.
    pub fn finish(&mut self) -> Option<&'static str> {
        match self.state {
            BlockState::Open => {
                self.state = BlockState::Closed;
                Some("}")
            }
            BlockState::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let tracker = FunctionBlockTracker::new();
        assert_eq!(tracker.state(), BlockState::Closed);
    }

    #[test]
    fn test_first_label_opens() {
        let mut tracker = FunctionBlockTracker::new();
        assert_eq!(tracker.open_label("start"), "start() {");
        assert!(tracker.is_open());
    }

    #[test]
    fn test_second_label_closes_previous() {
        let mut tracker = FunctionBlockTracker::new();
        tracker.open_label("first");
        assert_eq!(tracker.open_label("second"), "}\n\nsecond() {");
        assert!(tracker.is_open());
    }

    #[test]
    fn test_finish_closes_once() {
        let mut tracker = FunctionBlockTracker::new();
        tracker.open_label("only");
        assert_eq!(tracker.finish(), Some("}"));
        assert_eq!(tracker.finish(), None);
        assert_eq!(tracker.state(), BlockState::Closed);
    }

    #[test]
    fn test_finish_without_label() {
        let mut tracker = FunctionBlockTracker::new();
        assert_eq!(tracker.finish(), None);
    }
}
