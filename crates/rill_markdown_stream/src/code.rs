//! Per-line code colorization with protected spans.
//!
//! The highlighter scans one line with a priority-ordered set of passes.
//! Each pass claims `(kind, start, end)` byte ranges over the original text;
//! a later pass can never touch a range an earlier pass claimed. Output is
//! assembled at the end by walking the line and coloring each claimed range,
//! so no rule ever re-colors text a higher-priority rule owns.

use std::sync::LazyLock;

use regex::Regex;

use crate::languages::{TYPE_NAMES, keywords, normalize};
use crate::theme::ansi;

static STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""""[\s\S]*?"""|'''[\s\S]*?'''|"(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#).unwrap()
});
static BLOCK_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());
static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*$|#.*$|--.*$").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").unwrap());
static OPERATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+\+|--|==|!=|<=|>=|->|<<|>>|&&|\|\||[+\-*/%=&|^<>!~]").unwrap()
});
static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[\]()\{\}]").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[\w\-:]+").unwrap());
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s([\w\-:]+)=").unwrap());

/// What a claimed range is, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Str,
    Comment,
    Keyword,
    Call,
    Type,
    Number,
    Operator,
    Bracket,
    Tag,
    Attr,
    Key,
}

impl SpanKind {
    fn color(self) -> &'static str {
        match self {
            SpanKind::Str => ansi::GREEN,
            SpanKind::Comment => ansi::BRIGHT_BLACK,
            SpanKind::Keyword => ansi::BRIGHT_BLUE,
            SpanKind::Call => ansi::BRIGHT_GREEN,
            SpanKind::Type => ansi::BRIGHT_BLUE,
            SpanKind::Number => ansi::CYAN,
            SpanKind::Operator => ansi::BRIGHT_YELLOW,
            SpanKind::Bracket => ansi::BRIGHT_MAGENTA,
            SpanKind::Tag => ansi::BRIGHT_BLUE,
            SpanKind::Attr => ansi::MAGENTA,
            SpanKind::Key => ansi::MAGENTA,
        }
    }
}

#[derive(Debug)]
struct Span {
    start: usize,
    end: usize,
    kind: SpanKind,
}

/// Claimed byte ranges over one line, kept disjoint.
#[derive(Debug, Default)]
struct Claims {
    spans: Vec<Span>,
}

impl Claims {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.spans.iter().any(|s| start < s.end && s.start < end)
    }

    /// Claim a range unless an earlier pass already owns any part of it.
    fn claim(&mut self, start: usize, end: usize, kind: SpanKind) -> bool {
        if start >= end || self.overlaps(start, end) {
            return false;
        }
        self.spans.push(Span { start, end, kind });
        true
    }
}

/// Claim every regex match that does not overlap an earlier claim. On a
/// refused match the scan resumes one character later, so a claimable match
/// behind a refused one is still found.
fn claim_matches(claims: &mut Claims, re: &Regex, text: &str, kind: SpanKind) {
    let mut at = 0;
    while at <= text.len() {
        let Some(m) = re.find_at(text, at) else {
            break;
        };
        if claims.claim(m.start(), m.end(), kind) {
            at = m.end().max(m.start() + 1);
        } else {
            at = m.start() + char_width_at(text, m.start());
        }
    }
}

fn char_width_at(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}

fn claim_words(claims: &mut Claims, text: &str, kind: SpanKind, accept: impl Fn(&str) -> bool) {
    for m in WORD_RE.find_iter(text) {
        if accept(m.as_str()) {
            claims.claim(m.start(), m.end(), kind);
        }
    }
}

/// Identifier immediately followed by `(`, ignoring whitespace.
fn claim_call_sites(claims: &mut Claims, text: &str) {
    for m in WORD_RE.find_iter(text) {
        let rest = text[m.end()..].trim_start();
        if rest.starts_with('(') {
            claims.claim(m.start(), m.end(), SpanKind::Call);
        }
    }
}

fn claim_markup(claims: &mut Claims, text: &str) {
    claim_matches(claims, &TAG_RE, text, SpanKind::Tag);
    for cap in ATTR_RE.captures_iter(text) {
        if let Some(name) = cap.get(1) {
            claims.claim(name.start(), name.end(), SpanKind::Attr);
        }
    }
}

/// A protected string followed by a colon is an object key; re-kind it so
/// keys read differently from value strings.
fn rekind_json_keys(claims: &mut Claims, text: &str) {
    for span in &mut claims.spans {
        if span.kind != SpanKind::Str {
            continue;
        }
        if text[span.end..].trim_start().starts_with(':') {
            span.kind = SpanKind::Key;
        }
    }
}

/// Colorize a single line of code for a language tag.
///
/// Unrecognized tags still get strings and comments protected; only the
/// reserved-word pass is language-specific. Always terminates with a style
/// reset.
pub(crate) fn highlight_code(lang: &str, line: &str) -> String {
    let lang = normalize(lang);
    let mut claims = Claims::default();

    // Protection pass: string literals, then block comments, then line
    // comments. These spans are immutable to everything below.
    claim_matches(&mut claims, &STRING_RE, line, SpanKind::Str);
    claim_matches(&mut claims, &BLOCK_COMMENT_RE, line, SpanKind::Comment);
    claim_matches(&mut claims, &LINE_COMMENT_RE, line, SpanKind::Comment);

    match lang.as_str() {
        "html" | "xml" => claim_markup(&mut claims, line),
        "json" => rekind_json_keys(&mut claims, line),
        _ => {
            let words = keywords(&lang);
            if !words.is_empty() {
                claim_words(&mut claims, line, SpanKind::Keyword, |w| words.contains(&w));
            }
        }
    }

    claim_call_sites(&mut claims, line);
    claim_words(&mut claims, line, SpanKind::Type, |w| {
        w.starts_with(|c: char| c.is_ascii_uppercase()) || TYPE_NAMES.contains(&w.to_lowercase().as_str())
    });
    claim_matches(&mut claims, &NUMBER_RE, line, SpanKind::Number);
    claim_matches(&mut claims, &OPERATOR_RE, line, SpanKind::Operator);
    claim_matches(&mut claims, &BRACKET_RE, line, SpanKind::Bracket);

    claims.spans.sort_by_key(|s| s.start);

    let mut out = String::new();
    let mut pos = 0;
    for span in &claims.spans {
        out.push_str(&line[pos..span.start]);
        out.push_str(span.kind.color());
        out.push_str(&line[span.start..span.end]);
        out.push_str(ansi::RESET);
        pos = span.end;
    }
    out.push_str(&line[pos..]);
    out.push_str(ansi::RESET);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strip_ansi(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    fn colored_as(line: &str, lang: &str, fragment: &str, color: &str) -> bool {
        highlight_code(lang, line).contains(&format!("{color}{fragment}{}", ansi::RESET))
    }

    #[test]
    fn test_output_preserves_characters() {
        let fixture = r#"def greet(name): return f"hi {name}"  # docstring"#;
        let actual = strip_ansi(&highlight_code("python", fixture));

        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_keywords_are_colored() {
        assert!(colored_as("def f(): return 1", "python", "def", ansi::BRIGHT_BLUE));
        assert!(colored_as("fn main() {}", "rust", "fn", ansi::BRIGHT_BLUE));
    }

    #[test]
    fn test_string_protection_beats_keywords() {
        let actual = highlight_code("python", r#"x = "def not_a_keyword""#);

        assert!(actual.contains(&format!("{}{}{}", ansi::GREEN, r#""def not_a_keyword""#, ansi::RESET)));
        assert!(!actual.contains(&format!("{}def", ansi::BRIGHT_BLUE)));
    }

    #[test]
    fn test_line_comment_is_dimmed() {
        assert!(colored_as("x = 1  # note", "python", "# note", ansi::BRIGHT_BLACK));
        assert!(colored_as("int x; // counter", "c", "// counter", ansi::BRIGHT_BLACK));
    }

    #[test]
    fn test_comment_after_string_on_same_line() {
        let actual = highlight_code("python", r#"s = "a" # trailing"#);

        assert!(actual.contains(&format!("{}{}{}", ansi::GREEN, r#""a""#, ansi::RESET)));
        assert!(actual.contains(&format!("{}# trailing{}", ansi::BRIGHT_BLACK, ansi::RESET)));
    }

    #[test]
    fn test_call_sites_and_numbers() {
        let actual = highlight_code("python", "total = compute(42)");

        assert!(actual.contains(&format!("{}compute{}", ansi::BRIGHT_GREEN, ansi::RESET)));
        assert!(actual.contains(&format!("{}42{}", ansi::CYAN, ansi::RESET)));
    }

    #[test]
    fn test_capitalized_identifier_is_type_like() {
        assert!(colored_as("x = Widget", "python", "Widget", ansi::BRIGHT_BLUE));
    }

    #[test]
    fn test_unknown_language_still_protects_strings() {
        let fixture = r#"say "hello" # quietly"#;
        let actual = highlight_code("brainfuck", fixture);

        assert_eq!(strip_ansi(&actual), fixture);
        assert!(actual.contains(&format!("{}{}{}", ansi::GREEN, r#""hello""#, ansi::RESET)));
    }

    #[test]
    fn test_html_tags_and_attributes() {
        let actual = highlight_code("html", r#"<div class="x">"#);

        assert!(actual.contains(&format!("{}<div{}", ansi::BRIGHT_BLUE, ansi::RESET)));
        assert!(actual.contains(&format!("{}class{}", ansi::MAGENTA, ansi::RESET)));
    }

    #[test]
    fn test_json_keys_differ_from_value_strings() {
        let actual = highlight_code("json", r#""name": "value""#);

        assert!(actual.contains(&format!("{}{}{}", ansi::MAGENTA, r#""name""#, ansi::RESET)));
        assert!(actual.contains(&format!("{}{}{}", ansi::GREEN, r#""value""#, ansi::RESET)));
    }

    #[test]
    fn test_operator_inside_claimed_comment_is_skipped() {
        // The `--` in a lua comment belongs to the comment claim.
        let actual = highlight_code("lua", "x = 1 -- count");

        assert!(actual.contains(&format!("{}-- count{}", ansi::BRIGHT_BLACK, ansi::RESET)));
    }

    #[test]
    fn test_always_ends_with_reset() {
        assert!(highlight_code("python", "pass").ends_with(ansi::RESET));
        assert!(highlight_code("", "").ends_with(ansi::RESET));
    }
}
