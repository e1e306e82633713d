//! Inline emphasis styling with state carried across calls.
//!
//! Markup markers (`**`, `__`, backticks) are two characters at most, and a
//! stream fragment can end in the middle of one. The styler holds such a
//! partial marker and re-prepends it on the next call, so feeding a text
//! whole or split at any offset produces the same styled regions.

use crate::theme::ansi;
use crate::utils::strip_placeholders;

const RULE_WIDTH: usize = 48;

/// Heading prefix color and text per level (1..=6).
fn heading_prefix(level: usize) -> (&'static str, &'static str) {
    match level {
        1 => (ansi::BRIGHT_MAGENTA, "▍ "),
        2 => (ansi::BRIGHT_BLUE, "## "),
        3 => (ansi::CYAN, "### "),
        4 => (ansi::GREEN, "#### "),
        5 => (ansi::YELLOW, "##### "),
        _ => (ansi::BRIGHT_RED, "###### "),
    }
}

/// Inline styling state owned by the render session.
///
/// Open-style flags record which toggles are active; hold flags record a
/// partial marker whose completion is unknown until the next call.
#[derive(Debug, Default)]
pub(crate) struct InlineState {
    bold_open: bool,
    heading_open: bool,
    underline_open: bool,
    inline_code: bool,
    line_start: bool,
    star_hold: bool,
    backtick_hold: bool,
    underline_hold: bool,
}

impl InlineState {
    pub(crate) fn new() -> Self {
        Self { line_start: true, ..Self::default() }
    }

    /// Style one chunk of text, returning the output to write.
    pub(crate) fn feed(&mut self, text: &str) -> String {
        if text.is_empty() && !self.star_hold && !self.backtick_hold && !self.underline_hold {
            return String::new();
        }

        let mut held = String::new();
        if self.star_hold {
            held.push('*');
            self.star_hold = false;
        }
        if self.backtick_hold {
            held.push('`');
            self.backtick_hold = false;
        }
        if self.underline_hold {
            held.push('_');
            self.underline_hold = false;
        }
        held.push_str(&strip_placeholders(text));

        let chars: Vec<char> = held.chars().collect();
        let mut out = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            // Backticks always toggle, even inside inline code, so the code
            // span can be closed again.
            if c == '`' {
                if i + 1 == chars.len() {
                    self.backtick_hold = true;
                    break;
                }
                self.inline_code = !self.inline_code;
                out.push_str(if self.inline_code { ansi::BOLD } else { ansi::NORMAL });
                i += 1;
                continue;
            }

            // Inside inline code every other rule is suppressed.
            if self.inline_code {
                out.push(c);
                self.line_start = c == '\n';
                i += 1;
                continue;
            }

            if self.line_start && c == '#' {
                let mut j = i;
                while j < chars.len() && chars[j] == '#' {
                    j += 1;
                }
                let count = j - i;
                if (1..=6).contains(&count) && j < chars.len() && chars[j].is_whitespace() {
                    let (color, prefix) = heading_prefix(count);
                    out.push_str(ansi::BOLD);
                    out.push_str(color);
                    out.push_str(prefix);
                    self.heading_open = true;
                    let mut k = j;
                    while k < chars.len() && chars[k].is_whitespace() && chars[k] != '\n' {
                        k += 1;
                    }
                    i = k;
                    continue;
                }
            }

            if c == '_' {
                if i + 1 < chars.len() && chars[i + 1] == '_' {
                    self.underline_open = !self.underline_open;
                    out.push_str(if self.underline_open { ansi::DIM } else { ansi::NORMAL });
                    i += 2;
                    continue;
                }
                if i + 1 == chars.len() {
                    self.underline_hold = true;
                    break;
                }
            }

            if c == '*' {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    self.bold_open = !self.bold_open;
                    out.push_str(if self.bold_open { ansi::BOLD } else { ansi::NORMAL });
                    i += 2;
                    continue;
                }
                if i + 1 == chars.len() {
                    self.star_hold = true;
                    break;
                }
            }

            if self.line_start && c == '-' {
                let mut j = i;
                while j < chars.len() && (chars[j] == '-' || chars[j] == ' ') {
                    j += 1;
                }
                let dashes = chars[i..j].iter().filter(|&&d| d == '-').count();
                if dashes >= 3 {
                    out.push_str(&"─".repeat(RULE_WIDTH));
                    i = j;
                    continue;
                }
                if i + 1 < chars.len() && chars[i + 1].is_whitespace() {
                    out.push_str(ansi::BOLD);
                    out.push_str(ansi::BRIGHT_GREEN);
                    out.push('•');
                    out.push_str(ansi::RESET);
                    out.push(' ');
                    let mut k = i + 1;
                    while k < chars.len() && chars[k].is_whitespace() && chars[k] != '\n' {
                        k += 1;
                    }
                    i = k;
                    self.line_start = false;
                    continue;
                }
            }

            if c == '\n' {
                out.push_str(&self.close_open_styles());
                out.push('\n');
                self.line_start = true;
                i += 1;
                continue;
            }

            if self.line_start && c.is_whitespace() {
                out.push(c);
                i += 1;
                continue;
            }

            out.push(c);
            self.line_start = false;
            i += 1;
        }

        out
    }

    /// Flush held partial markers as literals and close any open style.
    pub(crate) fn finalize(&mut self) -> String {
        let mut out = String::new();
        if self.star_hold {
            out.push('*');
            self.star_hold = false;
        }
        if self.backtick_hold {
            out.push('`');
            self.backtick_hold = false;
        }
        if self.underline_hold {
            out.push('_');
            self.underline_hold = false;
        }
        if self.inline_code {
            out.push_str(ansi::NORMAL);
            self.inline_code = false;
        }
        out.push_str(&self.close_open_styles());
        out
    }

    fn close_open_styles(&mut self) -> String {
        let mut out = String::new();
        if self.heading_open {
            out.push_str(ansi::RESET);
            self.heading_open = false;
        }
        if self.underline_open {
            out.push_str(ansi::NORMAL);
            self.underline_open = false;
        }
        if self.bold_open {
            out.push_str(ansi::NORMAL);
            self.bold_open = false;
        }
        out
    }
}
