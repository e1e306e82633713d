//! The block state machine driving the whole renderer.
//!
//! Fragments are buffered until a full line is available, then each line is
//! routed by the current block state: plain text goes through the table
//! collector and the inline styler, code-block bodies through the line
//! highlighter, and pseudo blocks (`file:`, `tool_call`) to their status
//! handling.

use std::io::{self, Write};

use serde::Deserialize;

use crate::code::highlight_code;
use crate::inline::InlineState;
use crate::table::{is_table_line, render_table};
use crate::theme::Theme;

/// Upper bound on line-extraction passes per call. Exceeding it means an
/// internal bug; the remaining buffer is then emitted verbatim rather than
/// lost.
const MAX_LINE_PASSES: usize = 5000;

/// Current block context. Code states and table buffering are mutually
/// exclusive: entering any code state flushes the table buffer first.
#[derive(Debug)]
enum Block {
    Text,
    CodePlain { lang: String },
    CodeFile { path: String, lines: usize },
    CodeToolCall { buffer: String },
}

/// Wire shape of a tool-call pseudo block. Anything else renders raw.
#[derive(Debug, Deserialize)]
struct ToolCallNotice {
    action: Option<String>,
    msg: Option<String>,
}

/// Streaming renderer for one reply.
///
/// Feed fragments as they arrive and call [`RenderSession::finalize`] once at
/// stream end. Styled output is written incrementally; `finalize` returns the
/// trailing decoration text to append.
pub struct RenderSession<W: Write> {
    writer: W,
    theme: Theme,
    block: Block,
    styler: InlineState,
    table_lines: Vec<String>,
    buffer: String,
}

impl<W: Write> RenderSession<W> {
    /// Create a session with the detected terminal theme.
    pub fn new(writer: W) -> Self {
        Self::with_theme(writer, Theme::default())
    }

    /// Create a session with a custom theme.
    pub fn with_theme(writer: W, theme: Theme) -> Self {
        Self {
            writer,
            theme,
            block: Block::Text,
            styler: InlineState::new(),
            table_lines: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Feed one fragment, writing styled output for every completed line.
    ///
    /// Never fails: a write error degrades to emitting the fragment verbatim
    /// on a best-effort basis and is logged.
    pub fn feed(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        let result = self
            .process_buffer(false)
            .and_then(|_| self.writer.flush());
        if let Err(error) = result {
            tracing::warn!(error = %error, "stream render failed; emitting fragment verbatim");
            let _ = write!(self.writer, "{fragment}");
        }
    }

    /// Flush the trailing partial line, any buffered table, and open styles.
    ///
    /// Returns the trailing decoration text the caller should append to the
    /// stream.
    pub fn finalize(&mut self) -> String {
        if let Err(error) = self.process_buffer(true) {
            tracing::warn!(error = %error, "finalize degraded; returning raw buffer");
            return std::mem::take(&mut self.buffer);
        }
        let _ = self.writer.flush();

        let mut tail = String::new();

        // A stream can end mid-block; the buffered payload is still shown.
        match std::mem::replace(&mut self.block, Block::Text) {
            Block::CodeToolCall { buffer } if !buffer.is_empty() => {
                tail.push_str(&buffer);
                tail.push('\n');
            }
            Block::CodeFile { path, lines } => {
                tail.push_str(&self.file_done_line(&path, lines));
            }
            _ => {}
        }

        if !self.table_lines.is_empty() {
            let lines = std::mem::take(&mut self.table_lines);
            tail.push('\n');
            tail.push_str(&render_table(&lines, &self.theme));
        }

        tail.push_str(&self.styler.finalize());
        tail
    }

    fn process_buffer(&mut self, flush: bool) -> io::Result<()> {
        for _ in 0..MAX_LINE_PASSES {
            if self.buffer.is_empty() {
                return Ok(());
            }
            let (line, had_newline) = match self.buffer.find('\n') {
                Some(nl) => {
                    let line = self.buffer[..nl].to_string();
                    self.buffer.replace_range(..=nl, "");
                    (line, true)
                }
                None if flush => (std::mem::take(&mut self.buffer), false),
                None => return Ok(()),
            };
            self.handle_line(&line, had_newline)?;
        }

        tracing::warn!(
            remaining = self.buffer.len(),
            "line scan ceiling exceeded; flushing buffer verbatim"
        );
        let rest = std::mem::take(&mut self.buffer);
        write!(self.writer, "{rest}")?;
        Ok(())
    }

    fn handle_line(&mut self, line: &str, had_newline: bool) -> io::Result<()> {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            self.flush_table()?;
            match std::mem::replace(&mut self.block, Block::Text) {
                Block::Text => self.enter_code_block(trimmed)?,
                open => self.exit_code_block(open)?,
            }
            return Ok(());
        }

        match &mut self.block {
            Block::Text => {}
            Block::CodePlain { lang } => {
                let highlighted = highlight_code(lang, line);
                writeln!(self.writer, "  {highlighted}")?;
                return Ok(());
            }
            Block::CodeFile { lines, .. } => {
                *lines += 1;
                return Ok(());
            }
            Block::CodeToolCall { buffer } => {
                buffer.push_str(line);
                return Ok(());
            }
        }

        if is_table_line(line) {
            self.table_lines.push(line.to_string());
            return Ok(());
        }
        self.flush_table()?;

        let text = if had_newline { format!("{line}\n") } else { line.to_string() };
        let styled = self.styler.feed(&text);
        if !styled.is_empty() {
            write!(self.writer, "{styled}")?;
        }
        Ok(())
    }

    fn enter_code_block(&mut self, trimmed: &str) -> io::Result<()> {
        let tag = trimmed[3..].trim();

        if let Some(path) = tag.strip_prefix("file:") {
            let path = path.trim().to_string();
            // No newline: the completion status overwrites this line.
            write!(
                self.writer,
                "  {} {} {} ...",
                self.theme.file_spinner.apply("⟳"),
                self.theme.file_pending.apply("creating"),
                self.theme.file_path.apply(&path),
            )?;
            self.block = Block::CodeFile { path, lines: 0 };
            return Ok(());
        }

        if tag == "tool_call" {
            self.block = Block::CodeToolCall { buffer: String::new() };
            return Ok(());
        }

        let display = if tag.is_empty() { "CODE".to_string() } else { tag.to_uppercase() };
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "  {}",
            self.theme.code_header.apply(&format!("── {display} ──"))
        )?;
        self.block = Block::CodePlain { lang: tag.to_string() };
        Ok(())
    }

    fn exit_code_block(&mut self, open: Block) -> io::Result<()> {
        match open {
            Block::CodePlain { .. } => {
                writeln!(self.writer, "{}", self.theme.fence.apply("```"))?;
            }
            Block::CodeFile { path, lines } => {
                write!(self.writer, "{}", self.file_done_line(&path, lines))?;
            }
            Block::CodeToolCall { buffer } => self.render_tool_call(&buffer)?,
            Block::Text => {}
        }
        Ok(())
    }

    fn file_done_line(&self, path: &str, lines: usize) -> String {
        format!(
            "\r  {} {} {} ({} lines)\n",
            self.theme.file_check.apply("✓"),
            self.theme.file_done.apply("file ready"),
            self.theme.file_path.apply(path),
            lines,
        )
    }

    fn render_tool_call(&mut self, buffer: &str) -> io::Result<()> {
        match serde_json::from_str::<ToolCallNotice>(buffer) {
            Ok(ToolCallNotice { action: Some(action), msg: Some(msg) })
                if !action.is_empty() && !msg.is_empty() =>
            {
                writeln!(
                    self.writer,
                    "\r{}",
                    self.theme.tool_call.apply(&format!(" ⚡ {msg}"))
                )?;
            }
            Ok(_) | Err(_) => {
                // Unexpected shape or not JSON at all: show the payload
                // unstyled rather than dropping it.
                writeln!(self.writer, "{buffer}")?;
            }
        }
        Ok(())
    }

    fn flush_table(&mut self) -> io::Result<()> {
        if self.table_lines.is_empty() {
            return Ok(());
        }
        let lines = std::mem::take(&mut self.table_lines);
        writeln!(self.writer)?;
        write!(self.writer, "{}", render_table(&lines, &self.theme))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strip_ansi(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    /// Feed the whole input as one fragment; returns written output plus the
    /// finalize tail.
    fn render(input: &str) -> String {
        render_fragments(&[input])
    }

    fn render_fragments(fragments: &[&str]) -> String {
        let mut out = Vec::new();
        {
            let mut session = RenderSession::with_theme(&mut out, Theme::dark());
            for fragment in fragments {
                session.feed(fragment);
            }
            let tail = session.finalize();
            let mut written = String::from_utf8(out).unwrap();
            written.push_str(&tail);
            return written;
        }
    }

    #[test]
    fn test_plain_text_identity() {
        let fixture = "it was the best of times\nit was the worst of times";
        let actual = render(fixture);
        let expected = fixture;

        // No markup anywhere, so not even style sequences are emitted.
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_plain_text_identity_across_fragments() {
        let fixture = "alpha beta gamma\ndelta epsilon";
        for split in 0..fixture.len() {
            let (a, b) = fixture.split_at(split);
            let actual = render_fragments(&[a, b]);
            assert_eq!(actual, fixture, "split at {split}");
        }
    }

    #[test]
    fn test_split_token_invariance() {
        let fixture = "some **bold** and __dim__ text\n";
        let expected = render(fixture);
        for split in 0..fixture.len() {
            let (a, b) = fixture.split_at(split);
            let actual = render_fragments(&[a, b]);
            assert_eq!(actual, expected, "split at {split}");
        }
    }

    #[test]
    fn test_table_round_trip() {
        let actual = strip_ansi(&render("|A|B|\n|---|---|\n|1|2|\n|3|4|\n"));
        let expected = "\n\
┌───┬───┐
│ A │ B │
├───┼───┤
│ 1 │ 2 │
│ 3 │ 4 │
└───┴───┘
";

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_wide_glyphs_align_with_ascii_rows() {
        let actual = strip_ansi(&render("|你好|x|\n|---|---|\n|ab|y|\n"));

        let lines: Vec<&str> = actual.lines().filter(|l| !l.is_empty()).collect();
        assert!(actual.contains("│ 你好 │"));
        let widths: Vec<usize> =
            lines.iter().map(|l| crate::utils::visible_width(l)).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "widths: {widths:?}");
    }

    #[test]
    fn test_table_renders_before_code_block() {
        let actual = strip_ansi(&render("|a|b|\n|---|---|\n```py\nx = 1\n```\n"));

        let table_at = actual.find('┌').unwrap();
        let code_at = actual.find("── PY ──").unwrap();
        assert!(table_at < code_at);
        assert!(actual.contains("  x = 1"));
    }

    #[test]
    fn test_empty_fence_pair() {
        let actual = strip_ansi(&render("```\n```\n"));
        let expected = "\n  ── CODE ──\n```\n";

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_code_block_lines_are_indented() {
        let actual = strip_ansi(&render("```python\ndef f():\n    return 1\n```\n"));
        let expected = "\n  ── PYTHON ──\n  def f():\n      return 1\n```\n";

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_tool_call_with_expected_shape() {
        let actual =
            strip_ansi(&render("```tool_call\n{\"action\": \"read\", \"msg\": \"reading\"}\n```\n"));

        assert!(actual.contains("⚡ reading"));
        assert!(!actual.contains("action"));
    }

    #[test]
    fn test_garbage_tool_call_renders_raw() {
        let actual = strip_ansi(&render("```tool_call\n{not json at all\n```\nafter\n"));

        assert!(actual.contains("{not json at all"));
        assert!(actual.contains("after"));
    }

    #[test]
    fn test_tool_call_with_unexpected_shape_renders_raw() {
        let actual = strip_ansi(&render("```tool_call\n{\"other\": 1}\n```\n"));

        assert!(actual.contains("{\"other\": 1}"));
    }

    #[test]
    fn test_file_block_counts_lines_and_hides_content() {
        let actual = strip_ansi(&render("```file:src/main.rs\nfn main() {}\nsecret\n```\n"));

        assert!(actual.contains("creating src/main.rs"));
        assert!(actual.contains("file ready src/main.rs (2 lines)"));
        assert!(!actual.contains("secret"));
    }

    #[test]
    fn test_unterminated_file_block_completes_at_finalize() {
        let actual = strip_ansi(&render("```file:a.txt\none\n"));

        assert!(actual.contains("file ready a.txt (1 lines)"));
    }

    #[test]
    fn test_unterminated_tool_call_payload_is_not_lost() {
        let actual = strip_ansi(&render("```tool_call\n{\"half\": "));

        assert!(actual.contains("{\"half\": "));
    }

    #[test]
    fn test_table_flushes_on_plain_line() {
        let actual = strip_ansi(&render("|a|b|\n|---|---|\n|1|2|\nplain text\n"));

        let bottom_at = actual.find('└').unwrap();
        let plain_at = actual.find("plain text").unwrap();
        assert!(bottom_at < plain_at);
    }

    #[test]
    fn test_table_without_separator_degrades_to_text() {
        let actual = strip_ansi(&render("|a|b|\n|c|d|\nend\n"));

        assert!(actual.contains("|a|b|"));
        assert!(actual.contains("|c|d|"));
        assert!(!actual.contains('┌'));
    }

    #[test]
    fn test_fence_with_language_split_across_fragments() {
        let whole = render("```rust\nlet x = 1;\n```\n");
        let split = render_fragments(&["```ru", "st\nlet x", " = 1;\n``", "`\n"]);

        assert_eq!(split, whole);
    }

    #[test]
    fn test_heading_then_bullets() {
        let actual = strip_ansi(&render("# Title\n- one\n- two\n"));
        let expected = "▍ Title\n• one\n• two\n";

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_finalize_without_trailing_newline_closes_styles() {
        let actual = render("**dangling");

        assert!(strip_ansi(&actual).contains("dangling"));
        assert!(actual.ends_with(crate::theme::ansi::NORMAL));
    }
}
