//! Width measurement and scrubbing helpers shared across the renderer.

use unicode_width::UnicodeWidthChar;

/// Terminal theme mode (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ThemeMode {
    /// Dark terminal background.
    Dark,
    /// Light terminal background.
    Light,
}

/// Detects the terminal theme mode (dark or light).
pub(crate) fn detect_theme_mode() -> ThemeMode {
    use terminal_colorsaurus::{QueryOptions, ThemeMode as ColorsaurusThemeMode, theme_mode};

    match theme_mode(QueryOptions::default()) {
        Ok(ColorsaurusThemeMode::Light) => ThemeMode::Light,
        Ok(ColorsaurusThemeMode::Dark) | Err(_) => ThemeMode::Dark,
    }
}

/// Number of terminal columns `text` occupies.
///
/// ANSI CSI and OSC escape sequences count 0. Combining, format, and control
/// characters count 0; East-Asian wide and fullwidth characters count 2;
/// everything else (including ambiguous-width box drawing and the middle dot)
/// counts 1.
pub(crate) fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    // CSI: parameters and intermediates, then one final byte
                    // in 0x40..=0x7E.
                    chars.next();
                    for sc in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&sc) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    // OSC: terminated by BEL or ESC-backslash.
                    chars.next();
                    while let Some(sc) = chars.next() {
                        if sc == '\x07' {
                            break;
                        }
                        if sc == '\x1b' {
                            if chars.peek() == Some(&'\\') {
                                chars.next();
                            }
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }
        width += c.width().unwrap_or(0);
    }

    width
}

/// Drops placeholder codepoints (U+FFF0..=U+FFF3 and the BMP private-use
/// area) that must never reach the terminal.
pub(crate) fn strip_placeholders(text: &str) -> String {
    if !text.chars().any(is_placeholder) {
        return text.to_string();
    }
    text.chars().filter(|&c| !is_placeholder(c)).collect()
}

fn is_placeholder(c: char) -> bool {
    matches!(c, '\u{FFF0}'..='\u{FFF3}' | '\u{E000}'..='\u{F8FF}')
}
