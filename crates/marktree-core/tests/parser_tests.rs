//! Integration tests for the parsing engine and the tree matcher

use marktree_core::markdown::simple_markdown_rules;
use marktree_core::node::{forest_text, Style, StyleNode};
use marktree_core::{
    Node, ParseSpec, Parser, PatternRule, RuleSet, TextRule, TreeMatcher,
};
use rstest::rstest;

fn bold(text: &str) -> Node {
    Node::from(StyleNode::wrap_text(text, vec![Style::Bold]))
}

fn italic(text: &str) -> Node {
    Node::from(StyleNode::wrap_text(text, vec![Style::Italic]))
}

fn simple_parser(include_text_rule: bool) -> Parser<()> {
    Parser::with_rules(simple_markdown_rules(include_text_rule).unwrap())
}

fn assert_forest(expected: &[Node], actual: &[Node]) {
    let matcher = TreeMatcher::with_default_matchers();
    if let Some(mismatch) = matcher.first_mismatch(expected, actual) {
        panic!("{}\nexpected: {:#?}\nactual: {:#?}", mismatch, expected, actual);
    }
}

// ============================================================================
// Inline formatting scenarios
// ============================================================================

#[rstest]
fn test_parse_formatted_text(#[values(true, false)] include_text_rule: bool) {
    let forest = simple_parser(include_text_rule).parse("**bold**", ());
    assert_forest(&[bold("bold")], &forest);
}

#[rstest]
fn test_parse_leading_formatting(#[values(true, false)] include_text_rule: bool) {
    let forest = simple_parser(include_text_rule).parse("**bold** and not bold", ());
    assert_forest(&[bold("bold"), Node::text(" and not bold")], &forest);
}

#[rstest]
fn test_parse_trailing_formatting(#[values(true, false)] include_text_rule: bool) {
    let forest = simple_parser(include_text_rule).parse("not bold **and bold**", ());
    assert_forest(&[Node::text("not bold "), bold("and bold")], &forest);
}

#[rstest]
fn test_nested_formatting(#[values(true, false)] include_text_rule: bool) {
    let forest =
        simple_parser(include_text_rule).parse("**bold *and italics* and more bold**", ());
    let expected = Node::styled(
        vec![Style::Bold],
        vec![
            Node::text("bold "),
            italic("and italics"),
            Node::text(" and more bold"),
        ],
    );
    assert_forest(&[expected], &forest);
}

#[test]
fn test_newline_rule_collapses_blank_lines() {
    let forest = simple_parser(true).parse("Some text\n\n\n  \n\n\nnewline above", ());
    assert_forest(
        &[
            Node::text("Some text"),
            Node::text("\n"),
            Node::text("\n"),
            Node::text("newline above"),
        ],
        &forest,
    );
}

// ============================================================================
// Engine properties
// ============================================================================

#[rstest]
#[case::no_rules(RuleSet::new())]
#[case::simple(simple_markdown_rules(false).unwrap())]
#[case::simple_with_text(simple_markdown_rules(true).unwrap())]
fn test_empty_input_yields_empty_forest(#[case] rules: RuleSet<()>) {
    assert!(Parser::with_rules(rules).parse("", ()).is_empty());
}

#[rstest]
#[case("unmatched text")]
#[case("plain words, punctuation; and digits 123")]
#[case("ünïcödé text")]
fn test_no_match_yields_single_text_node(#[case] source: &str) {
    let forest = simple_parser(false).parse(source, ());
    assert_eq!(forest, vec![Node::text(source)]);
}

#[rstest]
#[case("a b  c")]
#[case("  leading and trailing  ")]
#[case("words, then: symbols! ?")]
#[case("multi\nline\n\ntext")]
fn test_fallback_and_matches_reconstruct_source(#[case] source: &str) {
    // Rules whose builders keep every matched character.
    let word: PatternRule<()> =
        PatternRule::new("word", r"\w+", |m, _, _| ParseSpec::terminal(Node::text(m.as_str())))
            .unwrap();
    let spaces: PatternRule<()> = PatternRule::new("spaces", r"[ \t]+", |m, _, _| {
        ParseSpec::terminal(StyleNode::wrap_text(m.as_str(), vec![Style::Comment]))
    })
    .unwrap();
    let parser = Parser::new().add_rule(word).add_rule(spaces);

    let forest = parser.parse(source, ());
    assert_eq!(forest_text(&forest), source);
}

#[test]
fn test_specific_rule_registered_first_wins() {
    let catch_all = || TextRule::new("plain", r"\n").unwrap();
    let specific = || simple_markdown_rules::<()>(false).unwrap();

    let parser = Parser::with_rules(specific()).add_rule(catch_all());
    assert_forest(&[bold("bold")], &parser.parse("**bold**", ()));

    let parser = Parser::new().add_rule(catch_all()).add_rules(&specific());
    assert_eq!(parser.parse("**bold**", ()), vec![Node::text("**bold**")]);
}

#[test]
fn test_parse_with_uses_alternative_rules() {
    let parser = simple_parser(true);
    let plain = RuleSet::new();
    assert_eq!(
        parser.parse_with("**bold**", (), &plain),
        vec![Node::text("**bold**")]
    );
    assert_forest(&[bold("bold")], &parser.parse("**bold**", ()));
}

#[test]
fn test_debugging_does_not_change_output() {
    let source = "**bold *and italics* and more bold**";
    let quiet = simple_parser(true).parse(source, ());
    let loud = simple_parser(true).with_debugging(true).parse(source, ());
    assert_eq!(quiet, loud);
}

// ============================================================================
// Tree matcher properties
// ============================================================================

#[test]
fn test_matcher_is_reflexive_on_parsed_forests() {
    let forest = simple_parser(true).parse("**a** _b_ ~~c~~ __d__ \\* e", ());
    assert!(TreeMatcher::with_default_matchers().matches(&forest, &forest));
    assert!(TreeMatcher::new().matches(&forest, &forest));
}

#[test]
fn test_matcher_rejects_different_sizes() {
    let matcher = TreeMatcher::new();
    let one = simple_parser(true).parse("**bold**", ());
    let two = simple_parser(true).parse("**bold** and not bold", ());
    assert!(!matcher.matches(&one, &two));
    assert!(!matcher.matches(&two, &one));
}

#[test]
fn test_matcher_detects_wrong_text() {
    let forest = simple_parser(true).parse("not bold **and bold**", ());
    let expected = vec![Node::text("not bold"), bold("and bold")];
    assert!(!TreeMatcher::with_default_matchers().matches(&expected, &forest));
}
