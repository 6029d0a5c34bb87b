//! Rules and ordered rule sets.
//!
//! A rule pairs a pattern with a builder. The parser tries rules strictly in
//! registration order at every cursor position and the first rule that
//! matches wins, so grammars must list specific rules before general ones.
//!
//! Patterns are matched against the text remaining at the cursor and are
//! always anchored there: a [`PatternRule`] compiles its pattern as
//! `\A(?:pattern)`, so a rule can never skip ahead.

use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex};

use crate::error::RuleError;
use crate::node::{Branch, Node};
use crate::parser::Parser;
use crate::span::Span;

/// A successful rule match against the text at the cursor.
///
/// All spans are byte offsets relative to the inspected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    haystack: &'t str,
    /// Group 0 is the whole match.
    groups: Vec<Option<Span>>,
}

impl<'t> RuleMatch<'t> {
    /// A match of `span` with no capture groups.
    pub fn new(haystack: &'t str, span: Span) -> Self {
        Self {
            haystack,
            groups: vec![Some(span)],
        }
    }

    /// A match with explicit capture groups; `span` is group 0.
    pub fn with_groups(haystack: &'t str, span: Span, groups: Vec<Option<Span>>) -> Self {
        let mut all = Vec::with_capacity(groups.len() + 1);
        all.push(Some(span));
        all.extend(groups);
        Self {
            haystack,
            groups: all,
        }
    }

    pub(crate) fn from_captures(haystack: &'t str, captures: &Captures<'t>) -> Option<Self> {
        let whole = captures.get(0)?;
        let groups = (1..captures.len())
            .map(|i| captures.get(i).map(|m| Span::new(m.start(), m.end())))
            .collect();
        Some(Self::with_groups(
            haystack,
            Span::new(whole.start(), whole.end()),
            groups,
        ))
    }

    /// The text the rule inspected.
    pub fn haystack(&self) -> &'t str {
        self.haystack
    }

    /// Span of the whole match.
    pub fn span(&self) -> Span {
        self.groups[0].unwrap_or_default()
    }

    /// Text of the whole match.
    pub fn as_str(&self) -> &'t str {
        self.span().slice(self.haystack)
    }

    /// Span of capture group `index`, if it participated in the match.
    pub fn group_span(&self, index: usize) -> Option<Span> {
        self.groups.get(index).copied().flatten()
    }

    /// Text of capture group `index`, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<&'t str> {
        self.group_span(index).map(|span| span.slice(self.haystack))
    }

    /// Number of groups, including group 0.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Bytes consumed from the cursor.
    pub fn len(&self) -> usize {
        self.span().end
    }

    /// A match that consumes nothing cannot advance the cursor.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a rule's builder asks the parser to emit.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseSpec<S> {
    /// Finished nodes, appended as-is (possibly none).
    Emit(Vec<Node>),
    /// An interior node whose children come from parsing `inner`.
    ///
    /// `inner` is relative to the match and is parsed with `state` using the
    /// same rule set before the children are frozen into `branch`.
    Nonterminal { branch: Branch, inner: Span, state: S },
}

impl<S> ParseSpec<S> {
    /// Emit a single finished node.
    pub fn terminal(node: impl Into<Node>) -> Self {
        ParseSpec::Emit(vec![node.into()])
    }

    /// Emit several finished nodes in order.
    pub fn emit(nodes: Vec<Node>) -> Self {
        ParseSpec::Emit(nodes)
    }

    /// Consume the match without emitting anything.
    pub fn skip() -> Self {
        ParseSpec::Emit(Vec::new())
    }

    /// Parse `inner` into the children of `branch`.
    pub fn nonterminal(branch: Branch, inner: Span, state: S) -> Self {
        ParseSpec::Nonterminal {
            branch,
            inner,
            state,
        }
    }
}

/// A pattern plus a node builder.
///
/// `S` is the parse state threaded through recursive descents. Rules must not
/// rely on mutating it: a builder that needs different state for its children
/// returns a fresh value in [`ParseSpec::Nonterminal`].
pub trait Rule<S>: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Match at the start of `source`.
    ///
    /// `last_capture` is the text consumed just before the cursor (`None` at
    /// the start of a parse).
    fn find<'t>(
        &self,
        source: &'t str,
        last_capture: Option<&str>,
        state: &S,
    ) -> Option<RuleMatch<'t>>;

    /// Turn a match into nodes.
    fn build(&self, matched: &RuleMatch<'_>, parser: &Parser<S>, state: &S) -> ParseSpec<S>;
}

type Builder<S> = dyn Fn(&RuleMatch<'_>, &Parser<S>, &S) -> ParseSpec<S> + Send + Sync;

/// A rule driven by a regular expression.
pub struct PatternRule<S> {
    name: String,
    pattern: String,
    regex: Regex,
    lookahead: Option<Regex>,
    rejected: Option<Rejection>,
    builder: Box<Builder<S>>,
}

/// A negative lookahead plus the whole-input form of the rule's pattern used
/// to look for a later match end.
struct Rejection {
    guard: Regex,
    exact: Regex,
}

impl<S> PatternRule<S> {
    /// Compile `pattern` (anchored at the cursor) with the given builder.
    pub fn new<F>(name: impl Into<String>, pattern: &str, builder: F) -> Result<Self, RuleError>
    where
        F: Fn(&RuleMatch<'_>, &Parser<S>, &S) -> ParseSpec<S> + Send + Sync + 'static,
    {
        let name = name.into();
        let regex = compile_anchored(&name, pattern)?;
        Ok(Self {
            name,
            pattern: pattern.to_string(),
            regex,
            lookahead: None,
            rejected: None,
            builder: Box::new(builder),
        })
    }

    /// Only accept matches where `pattern` matches right after the match.
    ///
    /// Stands in for a trailing `(?=...)`, which the regex engine does not
    /// support. The guard sees the remaining text of the current parse range.
    pub fn followed_by(mut self, pattern: &str) -> Result<Self, RuleError> {
        self.lookahead = Some(compile_anchored(&self.name, pattern)?);
        Ok(self)
    }

    /// Reject match ends where `pattern` matches right after the match.
    ///
    /// Stands in for a trailing `(?!...)`. A rejected end does not fail the
    /// rule: longer matches of the same pattern are tried in order of their
    /// end, as a backtracking engine would for a lazy pattern, and the first
    /// end that passes both guards wins.
    pub fn not_followed_by(mut self, pattern: &str) -> Result<Self, RuleError> {
        let exact = Regex::new(&format!(r"\A(?:{})\z", self.pattern)).map_err(|source| {
            RuleError::InvalidPattern {
                rule: self.name.clone(),
                source,
            }
        })?;
        self.rejected = Some(Rejection {
            guard: compile_anchored(&self.name, pattern)?,
            exact,
        });
        Ok(self)
    }

    fn accepts(&self, rest: &str) -> bool {
        let followed = self
            .lookahead
            .as_ref()
            .map_or(true, |lookahead| lookahead.is_match(rest));
        let rejected = self
            .rejected
            .as_ref()
            .is_some_and(|rejection| rejection.guard.is_match(rest));
        followed && !rejected
    }

    /// The next match ending after `after` that passes the guards.
    fn retry<'t>(
        &self,
        rejection: &Rejection,
        source: &'t str,
        after: usize,
    ) -> Option<RuleMatch<'t>> {
        (after + 1..=source.len())
            .filter(|&end| source.is_char_boundary(end) && self.accepts(&source[end..]))
            .find_map(|end| {
                let captures = rejection.exact.captures(&source[..end])?;
                RuleMatch::from_captures(source, &captures)
            })
    }

    /// The pattern as written (without the cursor anchor).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl<S> Rule<S> for PatternRule<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn find<'t>(
        &self,
        source: &'t str,
        _last_capture: Option<&str>,
        _state: &S,
    ) -> Option<RuleMatch<'t>> {
        let captures = self.regex.captures(source)?;
        let matched = RuleMatch::from_captures(source, &captures)?;
        if self.accepts(&source[matched.len()..]) {
            return Some(matched);
        }
        match &self.rejected {
            Some(rejection) => self.retry(rejection, source, matched.len()),
            None => None,
        }
    }

    fn build(&self, matched: &RuleMatch<'_>, parser: &Parser<S>, state: &S) -> ParseSpec<S> {
        (self.builder)(matched, parser, state)
    }
}

impl<S> fmt::Debug for PatternRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("lookahead", &self.lookahead.as_ref().map(Regex::as_str))
            .field(
                "not_followed_by",
                &self.rejected.as_ref().map(|rejection| rejection.guard.as_str()),
            )
            .finish()
    }
}

fn compile_anchored(rule: &str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(&format!(r"\A(?:{})", pattern)).map_err(|source| RuleError::InvalidPattern {
        rule: rule.to_string(),
        source,
    })
}

/// Restricts a rule to the start of a line.
///
/// The wrapped rule is only tried when nothing has been consumed yet or the
/// previous capture ended with a newline.
#[derive(Debug)]
pub struct BlockRule<R> {
    inner: R,
}

impl<R> BlockRule<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<S, R: Rule<S>> Rule<S> for BlockRule<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn find<'t>(
        &self,
        source: &'t str,
        last_capture: Option<&str>,
        state: &S,
    ) -> Option<RuleMatch<'t>> {
        if last_capture.map_or(true, |capture| capture.ends_with('\n')) {
            self.inner.find(source, last_capture, state)
        } else {
            None
        }
    }

    fn build(&self, matched: &RuleMatch<'_>, parser: &Parser<S>, state: &S) -> ParseSpec<S> {
        self.inner.build(matched, parser, state)
    }
}

/// Run-of-text rule.
///
/// Consumes at least one character, then stops right before the first
/// position where `stop` matches (or at the end of the text), emitting a
/// single text node. This is the lazy `[\s\S]+?(?=stop|$)` idiom.
#[derive(Debug, Clone)]
pub struct TextRule {
    name: String,
    stop: Regex,
}

impl TextRule {
    pub fn new(name: impl Into<String>, stop: &str) -> Result<Self, RuleError> {
        let name = name.into();
        let stop = Regex::new(stop).map_err(|source| RuleError::InvalidPattern {
            rule: name.clone(),
            source,
        })?;
        Ok(Self { name, stop })
    }
}

impl<S> Rule<S> for TextRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn find<'t>(
        &self,
        source: &'t str,
        _last_capture: Option<&str>,
        _state: &S,
    ) -> Option<RuleMatch<'t>> {
        let first = source.chars().next()?.len_utf8();
        let end = self
            .stop
            .find_at(source, first)
            .map_or(source.len(), |m| m.start());
        Some(RuleMatch::new(source, Span::new(0, end)))
    }

    fn build(&self, matched: &RuleMatch<'_>, _parser: &Parser<S>, _state: &S) -> ParseSpec<S> {
        ParseSpec::terminal(Node::text(matched.as_str()))
    }
}

/// An ordered, append-only sequence of rules.
///
/// Cloning is cheap: rules are shared behind `Arc`.
pub struct RuleSet<S> {
    rules: Vec<Arc<dyn Rule<S>>>,
}

impl<S> RuleSet<S> {
    /// An empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after every rule already registered.
    pub fn add_rule<R>(&mut self, rule: R) -> &mut Self
    where
        R: Rule<S> + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Append an already shared rule.
    pub fn add_shared(&mut self, rule: Arc<dyn Rule<S>>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Append every rule of `other`, preserving its order.
    pub fn add_rules(&mut self, other: &RuleSet<S>) -> &mut Self {
        self.rules.extend(other.rules.iter().cloned());
        self
    }

    /// Consuming form of [`RuleSet::add_rule`].
    pub fn with_rule<R>(mut self, rule: R) -> Self
    where
        R: Rule<S> + 'static,
    {
        self.add_rule(rule);
        self
    }

    /// Consuming form of [`RuleSet::add_rules`].
    pub fn with_rules(mut self, other: &RuleSet<S>) -> Self {
        self.add_rules(other);
        self
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule<S>> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl<S> Default for RuleSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for RuleSet<S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<S> Extend<Arc<dyn Rule<S>>> for RuleSet<S> {
    fn extend<I: IntoIterator<Item = Arc<dyn Rule<S>>>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl<S> fmt::Debug for RuleSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
