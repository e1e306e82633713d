//! Per-language reserved-word tables for the line highlighter.
//!
//! New languages are added by inserting a table entry; nothing else changes.

const PYTHON: &[&str] = &[
    "def", "class", "import", "from", "as", "if", "elif", "else", "for", "while", "return", "try",
    "except", "with", "yield", "lambda", "pass", "break", "continue", "in", "is", "not", "and",
    "or", "None", "True", "False",
];

const JAVA: &[&str] = &[
    "class", "public", "private", "protected", "static", "final", "void", "int", "double", "float",
    "boolean", "new", "return", "if", "else", "switch", "case", "break", "continue", "try",
    "catch", "finally", "import", "package", "for", "while", "do", "extends", "implements", "this",
    "super", "null", "true", "false",
];

const C: &[&str] = &[
    "int", "char", "float", "double", "void", "struct", "typedef", "return", "if", "else", "for",
    "while", "do", "switch", "case", "break", "continue", "static", "const", "include", "define",
    "NULL",
];

const CPP: &[&str] = &[
    "int", "char", "float", "double", "void", "struct", "class", "template", "typename", "using",
    "namespace", "std", "return", "if", "else", "for", "while", "do", "switch", "case", "break",
    "continue", "static", "const", "include", "define", "new", "delete", "NULL", "nullptr",
    "virtual", "override",
];

const CSHARP: &[&str] = &[
    "class", "public", "private", "protected", "static", "readonly", "void", "int", "double",
    "float", "bool", "new", "return", "if", "else", "switch", "case", "break", "continue", "try",
    "catch", "finally", "using", "namespace", "for", "while", "do", "var", "null", "true", "false",
    "async", "await",
];

const GO: &[&str] = &[
    "func", "package", "import", "var", "const", "type", "struct", "interface", "return", "if",
    "else", "switch", "case", "break", "continue", "for", "range", "go", "defer", "nil", "true",
    "false",
];

const RUST: &[&str] = &[
    "fn", "let", "mut", "pub", "use", "mod", "crate", "struct", "enum", "trait", "impl", "for",
    "while", "loop", "if", "else", "match", "return", "in", "ref", "move", "async", "await",
    "dyn", "where", "type", "const", "static", "unsafe", "self", "Self", "super", "true", "false",
];

const LUA: &[&str] = &[
    "function", "local", "end", "if", "then", "elseif", "else", "for", "while", "repeat", "until",
    "return", "nil", "true", "false",
];

const JS: &[&str] = &[
    "function", "class", "import", "from", "export", "const", "let", "var", "return", "if",
    "else", "switch", "case", "break", "continue", "try", "catch", "finally", "new", "this",
    "null", "true", "false", "await", "async",
];

const TS: &[&str] = &[
    "function", "class", "import", "from", "export", "const", "let", "var", "return", "if",
    "else", "switch", "case", "break", "continue", "try", "catch", "finally", "new", "this",
    "null", "true", "false", "await", "async", "interface", "type",
];

const CSS: &[&str] = &[
    "color", "background", "margin", "padding", "display", "position", "flex", "grid", "border",
    "font", "width", "height", "content", "hover",
];

/// Common primitive and container type names matched case-insensitively by
/// the type pass.
pub(crate) const TYPE_NAMES: &[&str] = &[
    "int", "float", "double", "char", "bool", "boolean", "string", "list", "map", "dict", "set",
    "tuple", "vector", "array", "object", "class",
];

/// Normalize a fence tag to a canonical language key.
pub(crate) fn normalize(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    match tag.as_str() {
        "py" => "python".to_string(),
        "c++" | "cc" | "hpp" => "cpp".to_string(),
        "cs" | "csharp" => "c#".to_string(),
        "javascript" | "node" => "js".to_string(),
        "typescript" => "ts".to_string(),
        "rs" => "rust".to_string(),
        _ => tag,
    }
}

/// Reserved words for a normalized language key; empty for unknown tags and
/// for markup languages, which are tagged structurally instead.
pub(crate) fn keywords(lang: &str) -> &'static [&'static str] {
    match lang {
        "python" => PYTHON,
        "java" => JAVA,
        "c" => C,
        "cpp" => CPP,
        "c#" => CSHARP,
        "go" => GO,
        "rust" => RUST,
        "lua" => LUA,
        "js" => JS,
        "ts" => TS,
        "css" => CSS,
        _ => &[],
    }
}
