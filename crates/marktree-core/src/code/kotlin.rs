//! Kotlin highlighting.
//!
//! Function declarations (`fun <T> name(params)`) and `val`/`var` fields are
//! split into styled parts; annotations are styled as generics.

use crate::error::RuleError;
use crate::node::Style;
use crate::rule::RuleSet;

use super::{generic_code_rules, groups_rule, token_rule, PATTERN_C_COMMENTS};

const DEFINITIONS: &[&str] = &["object", "class", "interface"];
const BUILTINS: &[&str] = &[
    "true", "false", "Boolean", "String", "Char", "Int", "UInt", "Long", "ULong", "Float",
    "Double", "Byte", "UByte", "Short", "UShort", "Self", "Set", "Map", "MutableMap", "List",
    "MutableList", "Array", "Runnable", "Unit", "arrayOf", "listOf", "mapOf", "setOf", "let",
    "also", "apply", "run",
];
const KEYWORDS: &[&str] = &[
    "public", "private", "internal", "inline", "lateinit", "abstract", "open", "reified",
    "import", "package", "class", "interface", "data", "enum", "sealed", "object", "typealias",
    "fun", "override", "this", "super", "where", "constructor", "init", "param", "delegate",
    "const", "val", "var", "get", "final", "vararg", "it", "return", "break", "continue",
    "suspend", "for", "while", "do", "if", "else", "when", "try", "catch", "finally", "throw",
    "in", "out", "is", "as", "typeof", "shr", "ushr", "shl", "ushl", "true", "false", "null",
];

pub const PATTERN_KOTLIN_STRING: &str = r#""(?:[^"\\]|\\[\s\S])*""#;
pub const PATTERN_KOTLIN_ANNOTATION: &str = r"@\w+";
pub const PATTERN_KOTLIN_FIELD: &str = r"(val|var)(\s+\w+)";
/// `fun <T> name(params)`; the parameter list may span lines.
pub const PATTERN_KOTLIN_FUNCTION: &str = r"(fun)( *<[^\n]*>)?( \w+)( *\((?s:.*?)\))";

/// Kotlin highlighting.
pub fn kotlin_rules<S: 'static>() -> Result<RuleSet<S>, RuleError> {
    let mut rules = RuleSet::new();
    rules
        .add_rule(token_rule("comment", PATTERN_C_COMMENTS, vec![Style::Comment])?)
        .add_rule(
            token_rule("string", PATTERN_KOTLIN_STRING, vec![Style::Literal])?
                .followed_by(r"\W|$")?,
        )
        .add_rule(token_rule(
            "annotation",
            PATTERN_KOTLIN_ANNOTATION,
            vec![Style::Generic],
        )?)
        .add_rule(groups_rule(
            "field",
            PATTERN_KOTLIN_FIELD,
            vec![Style::Keyword, Style::Identifier],
        )?)
        .add_rule(groups_rule(
            "function",
            PATTERN_KOTLIN_FUNCTION,
            vec![
                Style::Keyword,
                Style::Generic,
                Style::Identifier,
                Style::Parameters,
            ],
        )?);
    generic_code_rules(rules, DEFINITIONS, BUILTINS, KEYWORDS)
}
