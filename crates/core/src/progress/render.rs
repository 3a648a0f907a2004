//! Plain-text rendering of the progress table.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::{PhaseStatus, TitleProgress};
use crate::plan::strip_mkv_extension;

/// Width of the title column.
pub const TITLE_WIDTH: usize = 30;
const DISC_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 20;
const RULE_WIDTH: usize = 80;

/// Visible characters kept on the first line of an over-long title.
const TITLE_CUT: usize = TITLE_WIDTH - 3;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_RED: &str = "\x1b[31m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_YELLOW: &str = "\x1b[33m";
const COLOR_CYAN: &str = "\x1b[36m";

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ANSI escape pattern"));

/// Renders the status table into a single frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    colors: bool,
}

impl TableRenderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Renders the header, the rule and one row per title.
    pub fn render(&self, rows: &[TitleProgress]) -> String {
        let mut out = String::new();

        out.push_str(&pad("Title", TITLE_WIDTH));
        out.push_str(&pad("Disc", DISC_WIDTH));
        out.push_str(&pad("Extract", STATUS_WIDTH));
        out.push_str(&pad("Encode", STATUS_WIDTH));
        out.push('\n');
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');

        for row in rows {
            let name = strip_mkv_extension(&row.title);
            let disc = pad(&row.id.unit.to_string(), DISC_WIDTH);
            let extract = pad(&self.status_cell(row.extraction), STATUS_WIDTH);
            let encode = pad(&self.status_cell(row.encoding), STATUS_WIDTH);

            if visible_width(name) > TITLE_WIDTH {
                let head: String = name.chars().take(TITLE_CUT).collect();
                let spill: String = name.chars().skip(TITLE_CUT).collect();
                out.push_str(&format!("{head}   {disc}{extract}{encode}\n"));
                out.push_str(&spill);
                out.push('\n');
            } else {
                let title = pad(name, TITLE_WIDTH);
                out.push_str(&format!("{title}{disc}{extract}{encode}\n"));
            }
        }

        out
    }

    fn status_cell(&self, status: PhaseStatus) -> String {
        if !self.colors {
            return status.label().to_string();
        }
        let color = match status {
            PhaseStatus::Pending => COLOR_YELLOW,
            PhaseStatus::InProgress => COLOR_CYAN,
            PhaseStatus::Complete => COLOR_GREEN,
            PhaseStatus::Failed => COLOR_RED,
        };
        format!("{color}{}{COLOR_RESET}", status.label())
    }
}

/// Number of visible characters, ignoring ANSI color codes.
pub(crate) fn visible_width(s: &str) -> usize {
    ANSI_ESCAPE.replace_all(s, "").chars().count()
}

/// Right-pads `s` with spaces to `width` visible characters.
fn pad(s: &str, width: usize) -> String {
    let visible = visible_width(s);
    if visible >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - visible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TitleId;

    fn row(unit: u32, index: u32, title: &str) -> TitleProgress {
        TitleProgress::new(TitleId::new(unit, index), title)
    }

    #[test]
    fn test_header_and_rule() {
        let frame = TableRenderer::new(false).render(&[]);
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Title"));
        assert_eq!(&lines[0][30..34], "Disc");
        assert_eq!(&lines[0][40..47], "Extract");
        assert_eq!(&lines[0][60..66], "Encode");
        assert_eq!(lines[1], "-".repeat(80));
    }

    #[test]
    fn test_row_hides_mkv_suffix() {
        let frame = TableRenderer::new(false).render(&[row(1, 0, "Movie_t00.mkv")]);
        let line = frame.lines().nth(2).unwrap();

        assert!(line.starts_with("Movie_t00 "));
        assert!(!line.contains(".mkv"));
        assert_eq!(&line[30..31], "1");
        assert_eq!(line[40..60].trim_end(), "Pending");
        assert_eq!(line[60..].trim_end(), "Pending");
    }

    #[test]
    fn test_row_hides_uppercase_mkv_suffix() {
        let frame = TableRenderer::new(false).render(&[row(0, 0, "Movie_t01.MKV")]);
        let line = frame.lines().nth(2).unwrap();
        assert!(line.starts_with("Movie_t01 "));
    }

    #[test]
    fn test_long_title_wraps() {
        let name = "A_Very_Long_Title_Name_That_Overflows.mkv";
        let frame = TableRenderer::new(false).render(&[row(0, 3, name)]);
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("A_Very_Long_Title_Name_That   0"));
        assert_eq!(lines[3], "_Overflows");
    }

    #[test]
    fn test_colored_cells_keep_alignment() {
        let mut r = row(0, 0, "a.mkv");
        r.extraction = PhaseStatus::Complete;
        r.encoding = PhaseStatus::InProgress;
        let frame = TableRenderer::new(true).render(&[r]);
        let line = frame.lines().nth(2).unwrap();

        assert!(line.contains("\x1b[32mComplete\x1b[0m"));
        assert!(line.contains("\x1b[36mIn Progress\x1b[0m"));
        assert_eq!(visible_width(line), 80);
    }

    #[test]
    fn test_failed_is_red() {
        let mut r = row(0, 0, "a.mkv");
        r.extraction = PhaseStatus::Failed;
        let frame = TableRenderer::new(true).render(&[r]);
        assert!(frame.contains("\x1b[31mFailed\x1b[0m"));
    }

    #[test]
    fn test_visible_width_ignores_escapes() {
        assert_eq!(visible_width("\x1b[33mPending\x1b[0m"), 7);
        assert_eq!(visible_width("plain"), 5);
    }
}
