//! Markdown grammars.
//!
//! Grammars are plain data for the parser: ordered [`RuleSet`]s. Two are
//! provided:
//!
//! - [`simple_markdown_rules`]: inline formatting (escapes, newlines, bold,
//!   underline, italics, strikethrough, text).
//! - [`markdown_rules`]: headers, underlined header lines and list items,
//!   followed by the simple grammar.
//!
//! The rules are state-agnostic: whatever state the caller passes is handed
//! unchanged to nested parses.

use crate::error::RuleError;
use crate::node::{Branch, Node, Style};
use crate::rule::{BlockRule, ParseSpec, PatternRule, RuleSet, TextRule};

pub const PATTERN_ESCAPE: &str = r"\\([^0-9A-Za-z\s])";
pub const PATTERN_NEWLINE: &str = r"(?:\n *)*\n";
pub const PATTERN_BOLD: &str = r"\*\*([\s\S]+?)\*\*";
pub const PATTERN_UNDERLINE: &str = r"__([\s\S]+?)__";
/// Non-empty content that neither starts nor ends with whitespace.
pub const PATTERN_STRIKETHROUGH: &str = r"~~(\S(?:[\s\S]*?\S)?)~~";
/// `_word_` on word boundaries.
pub const PATTERN_ITALICS_UNDERSCORE: &str = r"\b_((?:__|\\[\s\S]|[^\\_])+?)_\b";
/// `*...*` opening on a non-space. `**` inside does not close the italics, so
/// bold can nest inside.
pub const PATTERN_ITALICS_ASTERISK: &str =
    r"\*((?:\*\*|[^\s*])(?:\*\*|\s+(?:[^*\s]|\*\*)|[^\s*])*?)\*";
/// Where a run of text ends: punctuation, a newline, a hard break or a
/// `scheme:` prefix.
pub const PATTERN_TEXT_STOP: &str = r"[^0-9A-Za-z\s\x{00c0}-\x{ffff}]|\n| {2,}\n|\w+:\S";

pub const PATTERN_HEADER: &str = r" *(#+)[ \t]([^\n]*)";
pub const PATTERN_HEADER_LINE: &str = r"(?: \t)*([^\n]+)\n *(=|-){3,} *";
pub const PATTERN_HEADER_CLASS: &str = r"\A(.*) \{([\w ]+)\}\s*\z";
pub const PATTERN_LIST_ITEM: &str = r"\*[ \t]([^\n]*)";

const END_OF_LINE: &str = r"\n|$";

/// A rule that wraps capture group 1 in a style node.
pub fn style_rule<S>(
    name: &str,
    pattern: &str,
    styles: Vec<Style>,
) -> Result<PatternRule<S>, RuleError>
where
    S: Clone + 'static,
{
    PatternRule::new(name, pattern, move |m, _, state: &S| {
        ParseSpec::nonterminal(
            Branch::Style(styles.clone()),
            m.group_span(1).unwrap_or_default(),
            state.clone(),
        )
    })
}

/// `\*` becomes the literal `*`.
pub fn escape_rule<S: 'static>() -> Result<PatternRule<S>, RuleError> {
    PatternRule::new("escape", PATTERN_ESCAPE, |m, _, _| {
        ParseSpec::terminal(Node::text(m.group(1).unwrap_or_default()))
    })
}

/// Collapses a run of blank lines at the start of a line into one `"\n"`.
pub fn newline_rule<S: 'static>() -> Result<BlockRule<PatternRule<S>>, RuleError> {
    let rule = PatternRule::new("newline", PATTERN_NEWLINE, |_, _, _| {
        ParseSpec::terminal(Node::text("\n"))
    })?;
    Ok(BlockRule::new(rule))
}

/// `**bold**`; a closing `**` directly followed by `*` keeps the bold open.
pub fn bold_rule<S: Clone + 'static>() -> Result<PatternRule<S>, RuleError> {
    style_rule("bold", PATTERN_BOLD, vec![Style::Bold])?.not_followed_by(r"\*")
}

pub fn underline_rule<S: Clone + 'static>() -> Result<PatternRule<S>, RuleError> {
    style_rule("underline", PATTERN_UNDERLINE, vec![Style::Underline])?
        .not_followed_by("_")
}

pub fn strikethrough_rule<S: Clone + 'static>() -> Result<PatternRule<S>, RuleError> {
    style_rule(
        "strikethrough",
        PATTERN_STRIKETHROUGH,
        vec![Style::Strikethrough],
    )
}

/// Both italics forms, underscore first.
pub fn italics_rules<S: Clone + 'static>() -> Result<RuleSet<S>, RuleError> {
    let underscore = style_rule("italics", PATTERN_ITALICS_UNDERSCORE, vec![Style::Italic])?;
    let asterisk = style_rule(
        "italics_asterisk",
        PATTERN_ITALICS_ASTERISK,
        vec![Style::Italic],
    )?
    .not_followed_by(r"\*")?;
    Ok(RuleSet::new().with_rule(underscore).with_rule(asterisk))
}

/// Plain text up to the next character that could start markup.
pub fn text_rule() -> Result<TextRule, RuleError> {
    TextRule::new("text", PATTERN_TEXT_STOP)
}

/// The inline grammar.
///
/// Without the text rule, text between markup is left to the parser's plain
/// text fallback, which produces one node per run instead of splitting at
/// punctuation.
pub fn simple_markdown_rules<S>(include_text_rule: bool) -> Result<RuleSet<S>, RuleError>
where
    S: Clone + 'static,
{
    let mut rules = RuleSet::new();
    rules
        .add_rule(escape_rule()?)
        .add_rule(newline_rule()?)
        .add_rule(bold_rule()?)
        .add_rule(underline_rule()?)
        .add_rules(&italics_rules()?)
        .add_rule(strikethrough_rule()?);
    if include_text_rule {
        rules.add_rule(text_rule()?);
    }
    Ok(rules)
}

/// `# Title` at the start of a line; the level is the number of `#`.
pub fn header_rule<S: Clone + 'static>() -> Result<BlockRule<PatternRule<S>>, RuleError> {
    let rule = PatternRule::new("header", PATTERN_HEADER, |m, _, state: &S| {
        let level = m.group(1).map_or(1, heading_level);
        ParseSpec::nonterminal(
            Branch::Style(vec![Style::Heading(level)]),
            m.group_span(2).unwrap_or_default(),
            state.clone(),
        )
    })?;
    Ok(BlockRule::new(rule))
}

/// A title underlined with `===` (level 1) or `---` (level 2).
pub fn header_line_rule<S: Clone + 'static>() -> Result<BlockRule<PatternRule<S>>, RuleError> {
    let rule = PatternRule::new("header_line", PATTERN_HEADER_LINE, |m, _, state: &S| {
        ParseSpec::nonterminal(
            Branch::Style(vec![Style::Heading(underline_level(m.group(2)))]),
            m.group_span(1).unwrap_or_default(),
            state.clone(),
        )
    })?
    .followed_by(END_OF_LINE)?;
    Ok(BlockRule::new(rule))
}

/// A header line whose title may end in a class list: `Title {red bold}`.
///
/// Each class name goes through `resolve`; the recognised ones become the
/// styles of a node wrapping the heading, and unknown names are dropped. The
/// title is parsed with the inline grammar.
pub fn classed_header_line_rule<S, F>(
    resolve: F,
) -> Result<BlockRule<PatternRule<S>>, RuleError>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(&str) -> Option<Style> + Send + Sync + 'static,
{
    let class_suffix = regex::Regex::new(PATTERN_HEADER_CLASS).map_err(|source| {
        RuleError::InvalidPattern {
            rule: "header_line_classed".to_string(),
            source,
        }
    })?;
    let inner_rules = simple_markdown_rules::<S>(true)?;

    let rule = PatternRule::new(
        "header_line_classed",
        PATTERN_HEADER_LINE,
        move |m, parser, state: &S| {
            let heading = Style::Heading(underline_level(m.group(2)));
            let title = m.group(1).unwrap_or_default();

            let Some(classed) = class_suffix.captures(title) else {
                return ParseSpec::nonterminal(
                    Branch::Style(vec![heading]),
                    m.group_span(1).unwrap_or_default(),
                    state.clone(),
                );
            };

            let text = classed.get(1).map_or("", |c| c.as_str());
            let classes: Vec<Style> = classed
                .get(2)
                .map_or("", |c| c.as_str())
                .split(' ')
                .filter_map(&resolve)
                .collect();

            let children = parser.parse_with(text, state.clone(), &inner_rules);
            let header = Node::styled(vec![heading], children);
            if classes.is_empty() {
                ParseSpec::terminal(header)
            } else {
                ParseSpec::terminal(Node::styled(classes, vec![header]))
            }
        },
    )?
    .followed_by(END_OF_LINE)?;
    Ok(BlockRule::new(rule))
}

/// `* item` at the start of a line.
pub fn list_item_rule<S: Clone + 'static>() -> Result<BlockRule<PatternRule<S>>, RuleError> {
    let rule = PatternRule::new("list_item", PATTERN_LIST_ITEM, |m, _, state: &S| {
        ParseSpec::nonterminal(
            Branch::ListItem,
            m.group_span(1).unwrap_or_default(),
            state.clone(),
        )
    })?;
    Ok(BlockRule::new(rule))
}

/// Headers, header lines and list items, then the inline grammar.
pub fn markdown_rules<S>() -> Result<RuleSet<S>, RuleError>
where
    S: Clone + 'static,
{
    let mut rules = RuleSet::new();
    rules
        .add_rule(header_rule()?)
        .add_rule(header_line_rule()?)
        .add_rule(list_item_rule()?)
        .add_rules(&simple_markdown_rules(true)?);
    Ok(rules)
}

/// Like [`markdown_rules`], with class lists on header lines resolved by
/// `resolve`.
pub fn markdown_rules_with_classes<S, F>(resolve: F) -> Result<RuleSet<S>, RuleError>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(&str) -> Option<Style> + Send + Sync + 'static,
{
    let mut rules = RuleSet::new();
    rules
        .add_rule(header_rule()?)
        .add_rule(classed_header_line_rule(resolve)?)
        .add_rule(list_item_rule()?)
        .add_rules(&simple_markdown_rules(true)?);
    Ok(rules)
}

fn heading_level(hashes: &str) -> u8 {
    u8::try_from(hashes.len()).unwrap_or(u8::MAX)
}

fn underline_level(marker: Option<&str>) -> u8 {
    match marker {
        Some("=") => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::StyleNode;
    use crate::parser::Parser;

    fn parse(source: &str) -> Vec<Node> {
        Parser::with_rules(simple_markdown_rules::<()>(true).unwrap()).parse(source, ())
    }

    #[test]
    fn test_patterns_compile() {
        assert_eq!(simple_markdown_rules::<()>(true).unwrap().len(), 8);
        assert_eq!(simple_markdown_rules::<()>(false).unwrap().len(), 7);
        assert_eq!(markdown_rules::<()>().unwrap().len(), 11);
    }

    #[test]
    fn test_escape_emits_literal() {
        assert_eq!(
            parse(r"\*not italic\*"),
            vec![
                Node::text("*"),
                Node::text("not italic"),
                Node::text("*"),
            ]
        );
    }

    #[test]
    fn test_underline_and_strikethrough() {
        assert_eq!(
            parse("__u__~~s~~"),
            vec![
                Node::from(StyleNode::wrap_text("u", vec![Style::Underline])),
                Node::from(StyleNode::wrap_text("s", vec![Style::Strikethrough])),
            ]
        );
    }

    #[test]
    fn test_strikethrough_rejects_padded_content() {
        let forest = parse("~~ x~~");
        assert!(forest.iter().all(|n| matches!(n, Node::Text(_))));
    }

    #[test]
    fn test_underscore_italics_needs_word_boundary() {
        assert_eq!(
            parse("_it_"),
            vec![Node::from(StyleNode::wrap_text("it", vec![Style::Italic]))]
        );
        // Inside a word the underscores are ordinary text.
        let forest = parse("snake_case_name");
        assert!(forest.iter().all(|n| matches!(n, Node::Text(_))));
    }

    #[test]
    fn test_closing_run_extends_bold() {
        let expected = Node::styled(
            vec![Style::Bold],
            vec![Node::from(StyleNode::wrap_text("x", vec![Style::Italic]))],
        );
        assert_eq!(parse("***x***"), vec![expected]);
    }

    #[test]
    fn test_bold_inside_asterisk_italics() {
        let forest = parse("*foo**bar*");
        assert_eq!(forest.len(), 1);
        match &forest[0] {
            Node::Style(italic) => assert_eq!(italic.styles, vec![Style::Italic]),
            other => panic!("Expected italic node, got {:?}", other),
        }
        assert_eq!(forest[0].plain_text(), "foo**bar");
    }

    #[test]
    fn test_closing_run_extends_underline() {
        let forest = parse("__a___");
        assert_eq!(forest.len(), 1);
        match &forest[0] {
            Node::Style(underline) => assert_eq!(underline.styles, vec![Style::Underline]),
            other => panic!("Expected underline node, got {:?}", other),
        }
        assert_eq!(forest[0].plain_text(), "a_");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading_level("###"), 3);
        assert_eq!(underline_level(Some("=")), 1);
        assert_eq!(underline_level(Some("-")), 2);
    }
}
