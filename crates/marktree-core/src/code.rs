//! Code blocks, inline code and syntax highlighting.
//!
//! A fenced block names its language right after the opening fence:
//!
//! ````text
//! ```rs
//! fn main() {}
//! ```
//! ````
//!
//! When [`CodeRules`] has a rule set for that language, the body is parsed
//! with it and the resulting tokens become the children of the code node.
//! Otherwise the body is kept raw.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RuleError;
use crate::markdown;
use crate::node::{CodeNode, Node, Style, StyleNode};
use crate::rule::{ParseSpec, PatternRule, RuleSet, TextRule};

mod go;
mod javascript;
mod kotlin;
mod rust;
mod typescript;

pub use go::go_rules;
pub use javascript::javascript_rules;
pub use kotlin::kotlin_rules;
pub use rust::rust_rules;
pub use typescript::typescript_rules;

/// A language tag must be separated from the body by whitespace, so
/// ```` ```code``` ```` is a block with body `code` and no language. The
/// body starts at its first non-whitespace character.
pub const PATTERN_CODE_BLOCK: &str =
    r"(?s)```(?:([A-Za-z0-9_+\-.]+)\s+)?\s*(\S.*?)\n*```";
pub const PATTERN_CODE_INLINE: &str = r"(?s)`\s*([^\n].*?)\n*`";

pub const PATTERN_LEADING_WS: &str = r"(?:\n\s*)+";
pub const PATTERN_NUMBERS: &str = r"\b\d+\b";
/// Unlike the markdown text rule this also stops on word boundaries, so
/// every word is its own token.
pub const PATTERN_CODE_TEXT_STOP: &str =
    r"\b|[^0-9A-Za-z\s\x{00c0}-\x{ffff}]|\n| {2,}\n|\w+:\S";
/// `// line` and `/* block */` comments.
pub const PATTERN_C_COMMENTS: &str = r"(?s)//[^\n]*|/\*.*?\*/";

/// Language tag to highlighting rules.
pub struct CodeRules<S> {
    languages: HashMap<String, RuleSet<S>>,
}

impl<S> CodeRules<S> {
    /// No highlighting: every block is kept raw.
    pub fn new() -> Self {
        Self {
            languages: HashMap::new(),
        }
    }

    /// Register `rules` under each of `tags`, replacing earlier entries.
    pub fn add_language(&mut self, tags: &[&str], rules: RuleSet<S>) -> &mut Self {
        for tag in tags {
            self.languages.insert((*tag).to_string(), rules.clone());
        }
        self
    }

    /// Rules registered under `tag`.
    pub fn language(&self, tag: &str) -> Option<&RuleSet<S>> {
        self.languages.get(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl<S: Clone + 'static> CodeRules<S> {
    /// Every bundled highlighter under its usual tags.
    pub fn with_default_languages() -> Result<Self, RuleError> {
        let mut code = Self::new();
        code.add_language(&["rs", "rust"], rust_rules()?)
            .add_language(&["kt", "kotlin"], kotlin_rules()?)
            .add_language(&["js", "javascript"], javascript_rules()?)
            .add_language(&["ts", "typescript"], typescript_rules()?)
            .add_language(&["go", "golang"], go_rules()?);
        Ok(code)
    }

    /// Fenced code blocks, highlighted with the languages registered so far.
    pub fn code_block_rule(&self) -> Result<PatternRule<S>, RuleError> {
        let languages = Arc::new(self.languages.clone());
        PatternRule::new("code_block", PATTERN_CODE_BLOCK, move |m, parser, state: &S| {
            let language = m.group(1);
            let body = m.group(2).unwrap_or_default();
            let children = language
                .and_then(|tag| languages.get(tag))
                .map(|rules| parser.parse_with(body, state.clone(), rules))
                .unwrap_or_default();
            ParseSpec::terminal(CodeNode {
                language: language.map(str::to_string),
                body: body.to_string(),
                children,
            })
        })
    }
}

impl<S> Default for CodeRules<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for CodeRules<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRules")
            .field("languages", &self.tags())
            .finish()
    }
}

/// `` `code` `` spans; never highlighted.
pub fn inline_code_rule<S: 'static>() -> Result<PatternRule<S>, RuleError> {
    PatternRule::new("inline_code", PATTERN_CODE_INLINE, |m, _, _| {
        ParseSpec::terminal(CodeNode::raw(None, m.group(1).unwrap_or_default()))
    })
}

/// A rule emitting the whole match as text, styled when `styles` is non-empty.
pub fn token_rule<S: 'static>(
    name: &str,
    pattern: &str,
    styles: Vec<Style>,
) -> Result<PatternRule<S>, RuleError> {
    PatternRule::new(name, pattern, move |m, _, _| {
        if styles.is_empty() {
            ParseSpec::terminal(Node::text(m.as_str()))
        } else {
            ParseSpec::terminal(StyleNode::wrap_text(m.as_str(), styles.clone()))
        }
    })
}

/// `\b(?:a|b|c)\b` over literal words.
pub fn word_pattern(words: &[&str]) -> String {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

/// A rule that splits its match at capture groups 1..=n.
///
/// Each participating group becomes a text node styled with the matching
/// entry of `styles`; text between and after the groups is kept as plain text
/// nodes, so the match is never shortened.
pub fn groups_rule<S: 'static>(
    name: &str,
    pattern: &str,
    styles: Vec<Style>,
) -> Result<PatternRule<S>, RuleError> {
    PatternRule::new(name, pattern, move |m, _, _| {
        let text = m.as_str();
        let mut nodes = Vec::new();
        let mut cursor = 0;
        for (index, style) in styles.iter().enumerate() {
            let Some(span) = m.group_span(index + 1).filter(|span| !span.is_empty()) else {
                continue;
            };
            if span.start > cursor {
                nodes.push(Node::text(&text[cursor..span.start]));
            }
            nodes.push(Node::from(StyleNode::wrap_text(
                span.slice(text),
                vec![style.clone()],
            )));
            cursor = span.end;
        }
        if cursor < text.len() {
            nodes.push(Node::text(&text[cursor..]));
        }
        ParseSpec::emit(nodes)
    })
}

/// A definition keyword and the name it introduces: `struct Foo`.
///
/// Emits the keyword and the name (with its leading whitespace) as two styled
/// nodes.
pub fn definition_rule<S: 'static>(keywords: &[&str]) -> Result<PatternRule<S>, RuleError> {
    let alternatives: Vec<String> = keywords.iter().map(|w| regex::escape(w)).collect();
    let pattern = format!(r"\b({})(\s+\w+)", alternatives.join("|"));
    groups_rule(
        "definition",
        &pattern,
        vec![Style::Keyword, Style::Definition],
    )
}

/// Rules shared by every highlighted language, after its own rules.
fn generic_code_rules<S: 'static>(
    mut rules: RuleSet<S>,
    definitions: &[&str],
    builtins: &[&str],
    keywords: &[&str],
) -> Result<RuleSet<S>, RuleError> {
    rules
        .add_rule(definition_rule(definitions)?)
        .add_rule(token_rule("builtin", &word_pattern(builtins), vec![Style::Builtin])?)
        .add_rule(token_rule("keyword", &word_pattern(keywords), vec![Style::Keyword])?)
        .add_rule(token_rule("number", PATTERN_NUMBERS, vec![Style::Literal])?)
        .add_rule(token_rule("whitespace", PATTERN_LEADING_WS, Vec::new())?)
        .add_rule(TextRule::new("code_text", PATTERN_CODE_TEXT_STOP)?);
    Ok(rules)
}

/// Markdown with code: escapes and code spans first, then the inline grammar.
pub fn code_rules<S: Clone + 'static>(languages: &CodeRules<S>) -> Result<RuleSet<S>, RuleError> {
    let mut rules = RuleSet::new();
    rules
        .add_rule(markdown::escape_rule()?)
        .add_rule(languages.code_block_rule()?)
        .add_rule(inline_code_rule()?)
        .add_rule(markdown::newline_rule()?)
        .add_rule(markdown::bold_rule()?)
        .add_rule(markdown::underline_rule()?)
        .add_rules(&markdown::italics_rules()?)
        .add_rule(markdown::strikethrough_rule()?)
        .add_rule(markdown::text_rule()?);
    Ok(rules)
}
