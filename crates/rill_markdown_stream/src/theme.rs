//! Theme configuration for streamed terminal output.
//!
//! Provides customizable styling for the block-level elements using the
//! `colored` crate.

use colored::{Color, ColoredString, Colorize};

/// Raw ANSI escapes used where styles toggle on and off across fragment
/// boundaries and a whole-string `Style::apply` cannot be used.
pub(crate) mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const NORMAL: &str = "\x1b[22m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BRIGHT_BLACK: &str = "\x1b[90m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
    pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
}

/// Style configuration for a single element.
#[derive(Clone, Debug, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
    pub dimmed: bool,
    pub underline: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dimmed(mut self) -> Self {
        self.dimmed = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Apply this style to a string.
    pub fn apply(&self, text: &str) -> ColoredString {
        let mut result = text.normal();

        if let Some(fg) = self.fg {
            result = result.color(fg);
        }
        if self.bold {
            result = result.bold();
        }
        if self.dimmed {
            result = result.dimmed();
        }
        if self.underline {
            result = result.underline();
        }

        result
    }
}

/// Theme containing styles for the block-level stream elements.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Closing fence marker.
    pub fence: Style,
    /// The `── LANG ──` header above a code block.
    pub code_header: Style,
    /// Spinner glyph on the file-creation status line.
    pub file_spinner: Style,
    /// Check glyph once a file block is complete.
    pub file_check: Style,
    /// The "creating" label.
    pub file_pending: Style,
    /// The "file ready" label.
    pub file_done: Style,
    /// File paths in status lines.
    pub file_path: Style,
    /// Formatted tool-call status line.
    pub tool_call: Style,
    /// Table box-drawing borders.
    pub table_border: Style,
    /// Table header cells.
    pub table_header: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

impl Theme {
    /// Detects the terminal theme (dark or light) and returns the appropriate
    /// theme.
    pub fn detect() -> Self {
        use crate::utils::{ThemeMode, detect_theme_mode};

        match detect_theme_mode() {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Dark theme (default).
    pub fn dark() -> Self {
        Self {
            fence: Style::new().fg(Color::Cyan),
            code_header: Style::new().fg(Color::Cyan).bold(),
            file_spinner: Style::new().fg(Color::Yellow),
            file_check: Style::new().fg(Color::Green),
            file_pending: Style::new().fg(Color::Cyan).bold(),
            file_done: Style::new().fg(Color::Green).bold(),
            file_path: Style::new().fg(Color::Cyan),
            tool_call: Style::new().fg(Color::Cyan).bold(),
            table_border: Style::new().fg(Color::BrightBlack),
            table_header: Style::new().fg(Color::BrightCyan).bold(),
        }
    }

    /// Light theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            fence: Style::new().fg(Color::Blue),
            code_header: Style::new().fg(Color::Blue).bold(),
            file_spinner: Style::new().fg(Color::Yellow),
            file_check: Style::new().fg(Color::Green),
            file_pending: Style::new().fg(Color::Blue).bold(),
            file_done: Style::new().fg(Color::Green).bold(),
            file_path: Style::new().fg(Color::Blue),
            tool_call: Style::new().fg(Color::Blue).bold(),
            table_border: Style::new().fg(Color::Black),
            table_header: Style::new().fg(Color::Blue).bold(),
        }
    }
}
