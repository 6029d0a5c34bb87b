use crate::error::RuleError;
use crate::node::Style;
use crate::rule::RuleSet;

use super::{generic_code_rules, token_rule};

const DEFINITIONS: &[&str] = &["struct", "trait", "mod", "enum", "fn"];
const BUILTINS: &[&str] = &[
    "Self", "Result", "Ok", "Err", "Option", "None", "Some", "Copy", "Clone", "Eq", "Hash",
    "Send", "Sync", "Sized", "Debug", "Display", "Arc", "Rc", "Box", "Pin", "Future", "true",
    "false", "bool", "usize", "i64", "u64", "u32", "i32", "str", "String",
];
const KEYWORDS: &[&str] = &[
    "let", "mut", "static", "const", "unsafe", "crate", "mod", "extern", "pub", "use", "struct",
    "enum", "trait", "type", "where", "impl", "dyn", "async", "await", "move", "self", "fn",
    "for", "while", "loop", "if", "else", "match", "break", "continue", "return", "try", "in",
    "as", "ref",
];

/// Rust highlighting.
pub fn rust_rules<S: 'static>() -> Result<RuleSet<S>, RuleError> {
    let mut rules = RuleSet::new();
    rules
        .add_rule(token_rule("comment", r"//[^\n]*", vec![Style::Comment])?)
        .add_rule(token_rule(
            "string",
            r#""(?:[^"\\]|\\[\s\S])*""#,
            vec![Style::Literal],
        )?)
        .add_rule(token_rule(
            "attribute",
            r"#!?\[[^\n]*?\]\n",
            vec![Style::Builtin],
        )?);
    generic_code_rules(rules, DEFINITIONS, BUILTINS, KEYWORDS)
}
