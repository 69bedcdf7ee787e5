//! Output surfaces for rendered reports.

use anyhow::{Context, Result};
use std::io::Write;

/// ANSI sequence that clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Something that can show one report per tick.
pub trait Surface {
    /// Replaces whatever is shown with `text`.
    fn show(&mut self, text: &str) -> Result<()>;
}

/// Writes reports to a terminal or any other writer.
pub struct TerminalSurface<W: Write> {
    out: W,
    clear: bool,
}

impl TerminalSurface<std::io::Stdout> {
    /// Creates a surface on standard output.
    pub fn stdout(clear: bool) -> Self {
        Self::new(std::io::stdout(), clear)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a surface on `out`. With `clear`, each report replaces the
    /// previous one on screen instead of scrolling.
    pub fn new(out: W, clear: bool) -> Self {
        Self { out, clear }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn show(&mut self, text: &str) -> Result<()> {
        if self.clear {
            self.out
                .write_all(CLEAR_SCREEN.as_bytes())
                .context("Failed to clear screen")?;
        }
        self.out
            .write_all(text.as_bytes())
            .context("Failed to write report")?;
        self.out.flush().context("Failed to flush report")?;
        Ok(())
    }
}
