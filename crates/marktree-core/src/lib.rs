//! # MarkTree Core
//!
//! A rule-driven parser that turns markdown-like text into a tree of nodes.
//!
//! A grammar is an ordered list of rules. Each rule is a pattern anchored at
//! the parser's cursor plus a builder that turns the match into nodes. The
//! first rule that matches wins; text no rule accepts becomes plain text, so
//! parsing never fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use marktree_core::markdown::simple_markdown_rules;
//! use marktree_core::{Node, Parser};
//!
//! let parser = Parser::with_rules(simple_markdown_rules::<()>(true).unwrap());
//! let forest = parser.parse("**bold** *italic*", ());
//!
//! assert!(matches!(forest[0], Node::Style(_)));
//! println!("Parsed {} root nodes", forest.len());
//! ```
//!
//! ## Checking a parse
//!
//! [`TreeMatcher`] compares two forests node by node:
//!
//! ```rust
//! use marktree_core::markdown::simple_markdown_rules;
//! use marktree_core::node::{Style, StyleNode};
//! use marktree_core::{Node, Parser, TreeMatcher};
//!
//! let parser = Parser::with_rules(simple_markdown_rules::<()>(false).unwrap());
//! let forest = parser.parse("Some text **bold**", ());
//!
//! let expected = vec![
//!     Node::text("Some text "),
//!     Node::from(StyleNode::wrap_text("bold", vec![Style::Bold])),
//! ];
//! assert!(TreeMatcher::with_default_matchers().matches(&expected, &forest));
//! ```
//!
//! ## Grammars
//!
//! - [`markdown::simple_markdown_rules`] - inline formatting
//! - [`markdown::markdown_rules`] - headers, header lines and lists
//! - [`code::code_rules`] - code blocks and inline code, with highlighting

pub mod code;
pub mod error;
pub mod markdown;
pub mod matcher;
pub mod node;
pub mod parser;
pub mod rule;
pub mod span;
pub mod traversal;

pub use error::RuleError;
pub use matcher::{Mismatch, TreeMatcher};
pub use node::{Forest, Node, NodeKind, Style};
pub use parser::Parser;
pub use rule::{BlockRule, ParseSpec, PatternRule, Rule, RuleMatch, RuleSet, TextRule};
pub use span::Span;
pub use traversal::{post_order, pre_order, traverse_post_order, traverse_pre_order};
