//! Go highlighting.

use crate::error::RuleError;
use crate::node::Style;
use crate::rule::RuleSet;

use super::{generic_code_rules, groups_rule, token_rule, PATTERN_C_COMMENTS};

const DEFINITIONS: &[&str] = &["type"];
const BUILTINS: &[&str] = &[
    "true", "false", "nil", "iota", "bool", "string", "int", "int8", "int16", "int32", "int64",
    "uint", "uint8", "uint16", "uint32", "uint64", "uintptr", "float32", "float64", "complex64",
    "complex128", "byte", "rune", "error", "append", "cap", "close", "copy", "delete", "len",
    "make", "new", "panic", "print", "println", "recover",
];
const KEYWORDS: &[&str] = &[
    "package", "import", "func", "type", "struct", "interface", "map", "chan", "go", "defer",
    "select", "var", "const", "for", "if", "else", "switch", "case", "default", "fallthrough",
    "break", "continue", "return", "range", "goto",
];

/// Interpreted strings with escapes, or raw backquoted strings.
pub const PATTERN_GO_STRING: &str = r#""(?:[^"\\]|\\.)*"|`[^`]*`"#;
pub const PATTERN_GO_FUNC: &str = r"(func)\b(\s+\w+)?";
/// A name directly followed by `(`; built-in functions called this way are
/// styled as calls.
pub const PATTERN_GO_CALL: &str = r"[A-Za-z_]\w*";

/// Go highlighting.
pub fn go_rules<S: 'static>() -> Result<RuleSet<S>, RuleError> {
    let mut rules = RuleSet::new();
    rules
        .add_rule(token_rule("comment", PATTERN_C_COMMENTS, vec![Style::Comment])?)
        .add_rule(token_rule("string", PATTERN_GO_STRING, vec![Style::Literal])?)
        .add_rule(groups_rule(
            "func",
            PATTERN_GO_FUNC,
            vec![Style::Keyword, Style::Identifier],
        )?)
        .add_rule(
            token_rule("call", PATTERN_GO_CALL, vec![Style::Identifier])?.followed_by(r"\(")?,
        );
    generic_code_rules(rules, DEFINITIONS, BUILTINS, KEYWORDS)
}
