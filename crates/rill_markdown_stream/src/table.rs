//! Table collection and rendering with box-drawing characters.

use crate::inline::InlineState;
use crate::theme::Theme;
use crate::utils::{strip_placeholders, visible_width};

const BOX_CHARS: &str = "┌┐└┘├┤┬┴┼─│ ";
const SEPARATOR_HINTS: &str = "┌└├┬┴┼─";

/// Whether a line is a table candidate: at least two cell delimiters after
/// placeholder scrubbing.
pub(crate) fn is_table_line(line: &str) -> bool {
    let cleaned = clean_cell_text(line);
    let trimmed = cleaned.trim();
    if trimmed.contains('|') {
        return trimmed.matches('|').count() >= 2;
    }
    if trimmed.contains('│') {
        return trimmed.matches('│').count() >= 2;
    }
    false
}

/// Whether a line separates a table header from its body: either a Markdown
/// dash row (`|---|---|`) or a box-drawing border row (`├──┼──┤`).
pub(crate) fn is_table_separator(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return false;
    }
    if s.contains('|') && s.contains('-') && s.chars().all(|c| "|-: ".contains(c)) {
        return true;
    }
    s.chars().any(|c| SEPARATOR_HINTS.contains(c)) && s.chars().all(|c| BOX_CHARS.contains(c))
}

fn clean_cell_text(text: &str) -> String {
    strip_placeholders(&text.replace('\t', "    "))
}

/// Split a table row into trimmed cells, discarding the empty cells a
/// bounding delimiter produces.
fn split_row(line: &str) -> Vec<String> {
    let mut s = line.trim();
    let sep = if s.contains('│') { '│' } else { '|' };
    s = s.strip_prefix(sep).unwrap_or(s);
    s = s.strip_suffix(sep).unwrap_or(s);
    s.split(sep)
        .map(|cell| clean_cell_text(cell.trim()))
        .collect()
}

fn style_cell(text: &str, is_header: bool, theme: &Theme) -> String {
    let mut styler = InlineState::new();
    let mut rendered = styler.feed(text);
    rendered.push_str(&styler.finalize());
    if is_header {
        theme.table_header.apply(&rendered).to_string()
    } else {
        rendered
    }
}

/// Render buffered candidate lines as an aligned Unicode box.
///
/// Lines before the first separator row become header rows, the rest body
/// rows. Without any separator the buffer is not a table; it is replayed as
/// plain styled text so no content is dropped.
pub(crate) fn render_table(lines: &[String], theme: &Theme) -> String {
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.trim_end_matches('\n'))
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut header_rows = 0;
    let mut separator_seen = false;
    for line in &lines {
        if is_table_separator(line) {
            separator_seen = true;
            continue;
        }
        if !separator_seen {
            header_rows += 1;
        }
        rows.push(split_row(line));
    }

    if rows.is_empty() || !separator_seen {
        let mut styler = InlineState::new();
        let mut out = String::new();
        for line in &lines {
            out.push_str(&styler.feed(&format!("{line}\n")));
        }
        out.push_str(&styler.finalize());
        return out;
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(col_count, String::new());
    }

    let styled: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .map(|cell| style_cell(cell, i < header_rows, theme))
                .collect()
        })
        .collect();

    // Column draw-width: widest cell plus one space of padding on each side,
    // never narrower than two columns.
    let mut widths = vec![0usize; col_count];
    for row in &styled {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }
    let widths: Vec<usize> = widths.iter().map(|w| (w + 2).max(2)).collect();

    let border = |text: &str| theme.table_border.apply(text).to_string();
    let hline = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
        border(&format!("{}{}{}", left, segments.join(mid), right))
    };

    let mut out_lines = vec![hline("┌", "┬", "┐")];
    for (i, row) in styled.iter().enumerate() {
        let mut cells = Vec::with_capacity(col_count);
        for (j, cell) in row.iter().enumerate() {
            let pad = (widths[j] - 1).saturating_sub(visible_width(cell)).max(1);
            cells.push(format!(" {}{}", cell, " ".repeat(pad)));
        }
        out_lines.push(format!(
            "{}{}{}",
            border("│"),
            cells.join(&border("│")),
            border("│")
        ));
        if header_rows > 0 && i + 1 == header_rows && header_rows < styled.len() {
            out_lines.push(hline("├", "┼", "┤"));
        }
    }
    out_lines.push(hline("└", "┴", "┘"));

    let mut out = out_lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::visible_width;

    fn strip_ansi(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    fn render(lines: &[&str]) -> String {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        strip_ansi(&render_table(&lines, &Theme::dark()))
    }

    #[test]
    fn test_is_table_line() {
        assert!(is_table_line("|a|b|"));
        assert!(is_table_line("a | b | c"));
        assert!(is_table_line("│x│y│"));
        assert!(!is_table_line("a | b"));
        assert!(!is_table_line("plain text"));
    }

    #[test]
    fn test_is_table_separator() {
        assert!(is_table_separator("|---|---|"));
        assert!(is_table_separator("| :--- | ---: |"));
        assert!(is_table_separator("├──┼──┤"));
        assert!(is_table_separator("┌──┬──┐"));
        assert!(!is_table_separator("│ a │ b │"));
        assert!(!is_table_separator("|a|b|"));
        assert!(!is_table_separator(""));
    }

    #[test]
    fn test_simple_table_box() {
        let actual = render(&["|A|B|", "|---|---|", "|1|2|", "|3|4|"]);
        let expected = "\
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
    fn test_no_separator_falls_back_to_plain_text() {
        let actual = render(&["|a|b|", "|c|d|"]);
        let expected = "|a|b|\n|c|d|\n";

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_uneven_rows_are_normalized() {
        let actual = render(&["|A|B|C|", "|---|---|---|", "|1|", "|1|2|3|4|"]);

        let lines: Vec<&str> = actual.lines().collect();
        // Every rendered line is flush with the border; short rows were
        // padded out to the widest row.
        let width = visible_width(lines[0]);
        for line in &lines {
            assert_eq!(visible_width(line), width, "line: {line:?}");
        }
        assert!(actual.contains('4'));
    }

    #[test]
    fn test_wide_glyph_column_alignment() {
        let actual = render(&["|名前|n|", "|---|---|", "|ab|1|"]);

        let lines: Vec<&str> = actual.lines().collect();
        let width = visible_width(lines[0]);
        for line in &lines {
            assert_eq!(visible_width(line), width, "line: {line:?}");
        }
        // Two wide glyphs measure four columns, so the first column draws
        // six wide.
        assert!(strip_ansi(&actual).contains("│ 名前 │"));
    }

    #[test]
    fn test_unicode_delimited_rows() {
        let actual = render(&["│A│B│", "├─┼─┤", "│1│2│"]);

        assert!(actual.contains("│ A │ B │"));
        assert!(actual.contains("│ 1 │ 2 │"));
    }

    #[test]
    fn test_markup_in_cells_is_styled_not_measured() {
        let rendered = {
            let lines = vec!["|**A**|B|".to_string(), "|---|---|".to_string(), "|1|2|".to_string()];
            render_table(&lines, &Theme::dark())
        };
        let plain = strip_ansi(&rendered);

        let lines: Vec<&str> = plain.lines().collect();
        let width = visible_width(lines[0]);
        for line in &lines {
            assert_eq!(visible_width(line), width, "line: {line:?}");
        }
        assert!(plain.contains("│ A │"));
    }

    #[test]
    fn test_header_rows_precede_first_separator() {
        let actual = render(&["|H1|H2|", "|G1|G2|", "|---|---|", "|1|2|"]);
        let expected = "\
┌────┬────┐
│ H1 │ H2 │
│ G1 │ G2 │
├────┼────┤
│ 1  │ 2  │
└────┴────┘
";

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_cells_keep_minimum_width() {
        let actual = render(&["||a|", "|---|---|", "||b|"]);

        let lines: Vec<&str> = actual.lines().collect();
        let width = visible_width(lines[0]);
        for line in &lines {
            assert_eq!(visible_width(line), width, "line: {line:?}");
        }
    }
}
