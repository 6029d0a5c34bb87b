//! Rule-driven parser.
//!
//! The parser walks a cursor through the source. At every position it tries
//! the rules in registration order; the first rule with a non-empty match
//! builds the node(s) for that span, recursing into an inner span when the
//! rule produces an interior node. When no rule matches, the smallest run of
//! text up to the next position where some rule does match becomes a plain
//! text node. Parsing never fails.
//!
//! Recursion depth follows the nesting depth of the input; deeply nested
//! markup is limited only by the call stack.

use tracing::{debug, trace, warn};

use crate::node::Node;
use crate::rule::{ParseSpec, Rule, RuleMatch, RuleSet};
use crate::span::Span;

/// A parser over an immutable rule set.
///
/// Parsing takes `&self`, so one parser can serve any number of parses,
/// including from several threads at once.
///
/// # Example
///
/// ```rust
/// use marktree_core::markdown::simple_markdown_rules;
/// use marktree_core::Parser;
///
/// let parser = Parser::with_rules(simple_markdown_rules::<()>(true).unwrap());
/// let forest = parser.parse("**bold** and not bold", ());
/// assert_eq!(forest.len(), 2);
/// ```
pub struct Parser<S> {
    rules: RuleSet<S>,
    debugging: bool,
}

impl<S> Parser<S> {
    /// Create a parser with no rules; everything parses as plain text.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
            debugging: false,
        }
    }

    /// Create a parser over an existing rule set.
    pub fn with_rules(rules: RuleSet<S>) -> Self {
        Self {
            rules,
            debugging: false,
        }
    }

    /// Append a rule after the ones already registered.
    pub fn add_rule<R>(mut self, rule: R) -> Self
    where
        R: Rule<S> + 'static,
    {
        self.rules.add_rule(rule);
        self
    }

    /// Append every rule of `rules`, preserving its order.
    pub fn add_rules(mut self, rules: &RuleSet<S>) -> Self {
        self.rules.add_rules(rules);
        self
    }

    /// Emit a trace event for every rule tried (MATCH/MISS).
    ///
    /// Off by default: the events are produced per rule per position.
    pub fn with_debugging(mut self, enabled: bool) -> Self {
        self.debugging = enabled;
        self
    }

    /// The rules tried at every position, in order.
    pub fn rules(&self) -> &RuleSet<S> {
        &self.rules
    }

    /// Parse `source` with this parser's rules.
    pub fn parse(&self, source: &str, state: S) -> Vec<Node> {
        self.parse_with(source, state, &self.rules)
    }

    /// Parse `source` with an alternative rule set.
    ///
    /// Rules use this to sub-parse text with a different grammar, e.g. a code
    /// block body with its language's highlighting rules.
    pub fn parse_with(&self, source: &str, state: S, rules: &RuleSet<S>) -> Vec<Node> {
        if source.is_empty() {
            return Vec::new();
        }
        debug!(len = source.len(), rules = rules.len(), "parsing source");
        let mut last_capture = None;
        self.parse_range(
            source,
            Span::new(0, source.len()),
            &state,
            rules,
            &mut last_capture,
        )
    }

    fn parse_range<'s>(
        &self,
        source: &'s str,
        range: Span,
        state: &S,
        rules: &RuleSet<S>,
        last_capture: &mut Option<&'s str>,
    ) -> Vec<Node> {
        let mut forest = Vec::new();
        let mut cursor = range.start;

        while cursor < range.end {
            let remaining = &source[cursor..range.end];

            let Some((rule, matched)) = self.first_match(rules, remaining, *last_capture, state)
            else {
                let end = self.fallback_end(source, cursor, range.end, rules, state);
                let run = &source[cursor..end];
                debug!(start = cursor, end, "no rule matched, emitting text");
                forest.push(Node::text(run));
                *last_capture = Some(run);
                cursor = end;
                continue;
            };

            let consumed = matched.len();
            let spec = rule.build(&matched, self, state);
            *last_capture = Some(&remaining[..consumed]);

            match spec {
                ParseSpec::Emit(nodes) => forest.extend(nodes),
                ParseSpec::Nonterminal {
                    branch,
                    inner,
                    state: child_state,
                } => {
                    let inner = inner.clamp(Span::new(0, consumed)).offset(cursor);
                    let children = if source.is_char_boundary(inner.start)
                        && source.is_char_boundary(inner.end)
                    {
                        trace!(rule = rule.name(), start = inner.start, end = inner.end, "descending");
                        self.parse_range(source, inner, &child_state, rules, last_capture)
                    } else {
                        warn!(
                            rule = rule.name(),
                            start = inner.start,
                            end = inner.end,
                            "inner span is not on a char boundary, dropping children"
                        );
                        Vec::new()
                    };
                    forest.push(branch.into_node(children));
                }
            }

            cursor += consumed;
        }

        forest
    }

    /// First rule, in order, with a match that makes progress.
    fn first_match<'r, 't>(
        &self,
        rules: &'r RuleSet<S>,
        remaining: &'t str,
        last_capture: Option<&str>,
        state: &S,
    ) -> Option<(&'r dyn Rule<S>, RuleMatch<'t>)> {
        rules.iter().find_map(|rule| {
            match rule.find(remaining, last_capture, state) {
                Some(matched) if advances(rule, &matched, remaining) => {
                    if self.debugging {
                        trace!(rule = rule.name(), matched = matched.as_str(), "MATCH");
                    }
                    Some((rule, matched))
                }
                _ => {
                    if self.debugging {
                        trace!(rule = rule.name(), source = remaining, "MISS");
                    }
                    None
                }
            }
        })
    }

    /// End of the plain-text run starting at `start`.
    ///
    /// Always consumes at least one character, then stops at the first char
    /// boundary where some rule matches.
    fn fallback_end(
        &self,
        source: &str,
        start: usize,
        end: usize,
        rules: &RuleSet<S>,
        state: &S,
    ) -> usize {
        let mut probe = start;
        loop {
            probe += source[probe..end].chars().next().map_or(1, char::len_utf8);
            if probe >= end {
                return end;
            }
            let pending = &source[start..probe];
            let rest = &source[probe..end];
            let found = rules.iter().any(|rule| {
                rule.find(rest, Some(pending), state)
                    .is_some_and(|matched| advances(rule, &matched, rest))
            });
            if found {
                return probe;
            }
        }
    }
}

/// A usable match consumes at least one byte and ends on a char boundary
/// inside `remaining`.
fn advances<S>(rule: &dyn Rule<S>, matched: &RuleMatch<'_>, remaining: &str) -> bool {
    let end = matched.len();
    if end == 0 {
        return false;
    }
    if end > remaining.len() || !remaining.is_char_boundary(end) {
        warn!(
            rule = rule.name(),
            end,
            len = remaining.len(),
            "match does not end on a char boundary of the text, ignoring it"
        );
        return false;
    }
    true
}

impl<S> Default for Parser<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Parser<S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            debugging: self.debugging,
        }
    }
}

impl<S> std::fmt::Debug for Parser<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("rules", &self.rules)
            .field("debugging", &self.debugging)
            .finish()
    }
}
