//! JavaScript highlighting.

use crate::error::RuleError;
use crate::node::Style;
use crate::rule::RuleSet;

use super::{generic_code_rules, groups_rule, token_rule, PATTERN_C_COMMENTS};

const DEFINITIONS: &[&str] = &["class"];
const BUILTINS: &[&str] = &[
    "String", "Boolean", "RegExp", "Number", "Date", "Math", "JSON", "Symbol", "Function",
    "Promise", "Array", "Object", "Map", "Set", "Uint8Array", "Uint16Array", "Uint32Array",
    "Uint8ClampedArray", "Buffer", "console", "process", "require", "isNaN", "parseInt",
    "parseFloat", "encodeURI", "decodeURI", "encodeURIComponent", "decodeURIComponent", "Error",
    "SyntaxError", "TypeError", "RangeError", "ReferenceError", "EvalError", "AggregateError",
];
const KEYWORDS: &[&str] = &[
    "public", "private", "protected", "import", "export", "default", "package", "class", "enum",
    "interface", "function", "super", "this", "extends", "implements", "arguments", "var", "let",
    "const", "static", "get", "set", "new", "return", "break", "continue", "yield", "void", "if",
    "else", "for", "while", "do", "switch", "async", "await", "case", "try", "catch", "finally",
    "delete", "throw", "NaN", "Infinity", "of", "in", "instanceof", "typeof", "debugger", "with",
    "true", "false", "null", "undefined",
];

/// Single, double and template quoted strings; escapes are skipped.
pub const PATTERN_JS_STRING: &str = concat!(
    r"'(?:[^'\\]|\\[\s\S])*'|",
    r#""(?:[^"\\]|\\[\s\S])*"|"#,
    r"`(?:[^`\\]|\\[\s\S])*`"
);
pub const PATTERN_JS_OBJECT_PROPERTY: &str = r"[\{\[,]\s*(\w+)\s*:";
pub const PATTERN_JS_GENERIC: &str = r"<\w[^<>\n]*>";
pub const PATTERN_JS_REGEX: &str = r"/(?:[^/\\\n]|\\.)+/\w*";
pub const PATTERN_JS_FIELD: &str = r"(var|let|const)(\s+\w+)";
/// A declaration keyword, an optional name and the parameter list, up to the
/// opening brace.
pub const PATTERN_JS_FUNCTION: &str =
    r"(?s)(function\*?|static|get|set|async)(\s+\w+)?(\s*\(.*?\))\s*\{";

/// JavaScript highlighting.
pub fn javascript_rules<S: 'static>() -> Result<RuleSet<S>, RuleError> {
    let mut rules = RuleSet::new();
    rules
        .add_rule(token_rule("comment", PATTERN_C_COMMENTS, vec![Style::Comment])?)
        .add_rule(
            token_rule("string", PATTERN_JS_STRING, vec![Style::Literal])?.followed_by(r"\W|$")?,
        )
        .add_rule(groups_rule(
            "object_property",
            PATTERN_JS_OBJECT_PROPERTY,
            vec![Style::Identifier],
        )?)
        .add_rule(token_rule("generic", PATTERN_JS_GENERIC, vec![Style::Generic])?)
        .add_rule(token_rule("regex", PATTERN_JS_REGEX, vec![Style::Literal])?)
        .add_rule(groups_rule(
            "field",
            PATTERN_JS_FIELD,
            vec![Style::Keyword, Style::Identifier],
        )?)
        .add_rule(groups_rule(
            "function",
            PATTERN_JS_FUNCTION,
            vec![Style::Keyword, Style::Identifier, Style::Parameters],
        )?);
    generic_code_rules(rules, DEFINITIONS, BUILTINS, KEYWORDS)
}
