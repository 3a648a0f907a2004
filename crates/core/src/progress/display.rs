//! Output sinks for rendered progress frames.

use std::io::Write;

/// Clears the screen and moves the cursor home.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Receives every rendered frame of the progress table.
///
/// Called with the tracker lock held; implementations must not call back
/// into the tracker.
pub trait ProgressDisplay: Send {
    /// Shows a freshly rendered frame.
    fn refresh(&mut self, frame: &str);

    /// Whether status cells should be ANSI-colored.
    fn colors(&self) -> bool {
        false
    }
}

/// Redraws the whole terminal on every frame.
pub struct TerminalDisplay {
    header: Option<String>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self { header: None }
    }

    /// Prints `header` above the table on every redraw.
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressDisplay for TerminalDisplay {
    fn refresh(&mut self, frame: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        let mut text = String::from(CLEAR_SCREEN);
        if let Some(ref header) = self.header {
            text.push_str(header);
            text.push('\n');
        }
        text.push_str(frame);

        // A broken stdout must not abort the run.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn colors(&self) -> bool {
        true
    }
}

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl ProgressDisplay for NullDisplay {
    fn refresh(&mut self, _frame: &str) {}
}
