//! Structural comparison of two forests.
//!
//! [`TreeMatcher`] is a verification tool: tests build the forest they expect
//! and compare it with what the parser produced. Both forests are flattened in
//! post-order and compared position by position. Two nodes at the same
//! position must have the same kind and the same number of children, and must
//! satisfy the comparator registered for their kind, if any. Kinds without a
//! comparator are compared structurally only.
//!
//! The per-node child count check makes post-order alignment imply equal tree
//! shape for every kind, including ones whose arity varies.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use crate::node::{Node, NodeKind};
use crate::traversal::post_order;

/// Compares two nodes of the same kind.
pub type NodeComparator = Box<dyn Fn(&Node, &Node) -> bool + Send + Sync>;

/// Why two forests did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The forests have different total node counts.
    Size { left: usize, right: usize },
    /// The nodes at `index` (in post-order) are of different kinds.
    Kind {
        index: usize,
        left: NodeKind,
        right: NodeKind,
    },
    /// The nodes at `index` have different numbers of children.
    Arity {
        index: usize,
        left: usize,
        right: usize,
    },
    /// The comparator for `kind` rejected the nodes at `index`.
    Payload { index: usize, kind: NodeKind },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Size { left, right } => {
                write!(f, "forest sizes differ: {} vs {} nodes", left, right)
            }
            Mismatch::Kind { index, left, right } => write!(
                f,
                "node {} differs in kind: {} vs {}",
                index,
                left.name(),
                right.name()
            ),
            Mismatch::Arity { index, left, right } => write!(
                f,
                "node {} differs in child count: {} vs {}",
                index, left, right
            ),
            Mismatch::Payload { index, kind } => {
                write!(f, "{} node {} differs in content", kind.name(), index)
            }
        }
    }
}

/// Compares forests using per-kind comparators.
///
/// # Example
///
/// ```rust
/// use marktree_core::node::{Node, Style, StyleNode};
/// use marktree_core::TreeMatcher;
///
/// let matcher = TreeMatcher::with_default_matchers();
/// let expected = vec![Node::from(StyleNode::wrap_text("bold", vec![Style::Bold]))];
/// let actual = vec![Node::from(StyleNode::wrap_text("bold", vec![Style::Bold]))];
/// assert!(matcher.matches(&expected, &actual));
/// ```
#[derive(Default)]
pub struct TreeMatcher {
    comparators: HashMap<NodeKind, NodeComparator>,
}

impl TreeMatcher {
    /// A matcher with no comparators: structure and kinds only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher with the built-in comparators installed.
    pub fn with_default_matchers() -> Self {
        let mut matcher = Self::new();
        matcher.register_default_matchers();
        matcher
    }

    /// Register (or replace) the comparator for `kind`.
    ///
    /// The comparator is only ever called with two nodes of that kind.
    pub fn register_matcher<F>(&mut self, kind: NodeKind, comparator: F) -> &mut Self
    where
        F: Fn(&Node, &Node) -> bool + Send + Sync + 'static,
    {
        self.comparators.insert(kind, Box::new(comparator));
        self
    }

    /// Install the built-in comparators.
    ///
    /// - text: exact content equality
    /// - style: same number of styles, same style variant at each position
    ///   (values inside a style are not compared)
    /// - code: same language
    ///
    /// List items carry no payload and stay structural.
    pub fn register_default_matchers(&mut self) -> &mut Self {
        for kind in NodeKind::ALL {
            match kind {
                NodeKind::Text => {
                    self.register_matcher(kind, |left, right| match (left, right) {
                        (Node::Text(a), Node::Text(b)) => a.content == b.content,
                        _ => false,
                    });
                }
                NodeKind::Style => {
                    self.register_matcher(kind, |left, right| match (left, right) {
                        (Node::Style(a), Node::Style(b)) => {
                            a.styles.len() == b.styles.len()
                                && a.styles
                                    .iter()
                                    .zip(&b.styles)
                                    .all(|(x, y)| mem::discriminant(x) == mem::discriminant(y))
                        }
                        _ => false,
                    });
                }
                NodeKind::Code => {
                    self.register_matcher(kind, |left, right| match (left, right) {
                        (Node::Code(a), Node::Code(b)) => {
                            a.language == b.language && a.body == b.body
                        }
                        _ => false,
                    });
                }
                NodeKind::ListItem => {}
            }
        }
        self
    }

    /// Whether a comparator is registered for `kind`.
    pub fn has_matcher(&self, kind: NodeKind) -> bool {
        self.comparators.contains_key(&kind)
    }

    /// True when both forests have the same shape, kinds and payloads.
    pub fn matches(&self, left: &[Node], right: &[Node]) -> bool {
        self.first_mismatch(left, right).is_none()
    }

    /// The first difference between the forests, in post-order.
    pub fn first_mismatch(&self, left: &[Node], right: &[Node]) -> Option<Mismatch> {
        let left_nodes = post_order(left);
        let right_nodes = post_order(right);

        if left_nodes.len() != right_nodes.len() {
            return Some(Mismatch::Size {
                left: left_nodes.len(),
                right: right_nodes.len(),
            });
        }

        for (index, (a, b)) in left_nodes.iter().zip(&right_nodes).enumerate() {
            let kind = a.kind();
            if kind != b.kind() {
                return Some(Mismatch::Kind {
                    index,
                    left: kind,
                    right: b.kind(),
                });
            }

            if a.children().len() != b.children().len() {
                return Some(Mismatch::Arity {
                    index,
                    left: a.children().len(),
                    right: b.children().len(),
                });
            }

            if let Some(comparator) = self.comparators.get(&kind) {
                if !comparator(*a, *b) {
                    return Some(Mismatch::Payload { index, kind });
                }
            }
        }

        None
    }
}

impl fmt::Debug for TreeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.comparators.keys().map(|k| k.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("TreeMatcher")
            .field("comparators", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{CodeNode, Style, StyleNode};

    fn bold(text: &str) -> Node {
        Node::from(StyleNode::wrap_text(text, vec![Style::Bold]))
    }

    #[test]
    fn test_reflexive() {
        let forest = vec![
            Node::text("a"),
            Node::styled(vec![Style::Bold], vec![Node::text("b"), bold("c")]),
            Node::list_item(vec![Node::text("d")]),
        ];
        assert!(TreeMatcher::with_default_matchers().matches(&forest, &forest));
        assert!(TreeMatcher::new().matches(&forest, &forest));
    }

    #[test]
    fn test_size_mismatch() {
        let matcher = TreeMatcher::new();
        let left = vec![Node::text("a")];
        let right = vec![Node::text("a"), Node::text("b")];
        assert_eq!(
            matcher.first_mismatch(&left, &right),
            Some(Mismatch::Size { left: 1, right: 2 })
        );
    }

    #[test]
    fn test_text_content_only_checked_with_comparator() {
        let left = vec![Node::text("a")];
        let right = vec![Node::text("b")];
        assert!(TreeMatcher::new().matches(&left, &right));
        assert_eq!(
            TreeMatcher::with_default_matchers().first_mismatch(&left, &right),
            Some(Mismatch::Payload {
                index: 0,
                kind: NodeKind::Text
            })
        );
    }

    #[test]
    fn test_style_compares_variants_not_values() {
        let matcher = TreeMatcher::with_default_matchers();
        let h1 = vec![Node::from(StyleNode::wrap_text("t", vec![Style::Heading(1)]))];
        let h2 = vec![Node::from(StyleNode::wrap_text("t", vec![Style::Heading(2)]))];
        assert!(matcher.matches(&h1, &h2));

        let italic = vec![Node::from(StyleNode::wrap_text("t", vec![Style::Italic]))];
        assert!(!matcher.matches(&h1, &italic));

        let two = vec![Node::from(StyleNode::wrap_text(
            "t",
            vec![Style::Heading(1), Style::Bold],
        ))];
        assert!(!matcher.matches(&h1, &two));
    }

    #[test]
    fn test_same_count_different_shape_is_rejected() {
        // Same kinds and count, but the list item sits at a different position.
        let left = vec![
            Node::text("a"),
            Node::text("b"),
            Node::list_item(vec![]),
        ];
        let right = vec![
            Node::list_item(vec![Node::text("a")]),
            Node::text("b"),
        ];
        let matcher = TreeMatcher::new();
        assert!(!matcher.matches(&left, &right));

        let left = vec![Node::list_item(vec![Node::text("a"), Node::text("b")])];
        let right = vec![
            Node::text("a"),
            Node::list_item(vec![Node::text("b")]),
        ];
        assert_eq!(
            matcher.first_mismatch(&left, &right),
            Some(Mismatch::Arity {
                index: 2,
                left: 2,
                right: 1
            })
        );
    }

    #[test]
    fn test_custom_comparator_replaces_default() {
        let mut matcher = TreeMatcher::with_default_matchers();
        matcher.register_matcher(NodeKind::Text, |a, b| match (a, b) {
            (Node::Text(a), Node::Text(b)) => a.content.eq_ignore_ascii_case(&b.content),
            _ => false,
        });
        assert!(matcher.matches(&[Node::text("ABC")], &[Node::text("abc")]));
    }

    #[test]
    fn test_code_language_compared() {
        let matcher = TreeMatcher::with_default_matchers();
        let rust = vec![Node::from(CodeNode::raw(Some("rust".into()), "x"))];
        let plain = vec![Node::from(CodeNode::raw(None, "x"))];
        assert!(!matcher.matches(&rust, &plain));
        assert!(matcher.has_matcher(NodeKind::Code));
        assert!(!matcher.has_matcher(NodeKind::ListItem));
    }

    #[test]
    fn test_code_body_compared() {
        let matcher = TreeMatcher::with_default_matchers();
        let expected = vec![Node::from(CodeNode::raw(None, "let x = 1;"))];
        let actual = vec![Node::from(CodeNode::raw(None, "let x = 2;"))];
        assert!(!matcher.matches(&expected, &actual));
        assert_eq!(
            matcher.first_mismatch(&expected, &actual),
            Some(Mismatch::Payload {
                index: 0,
                kind: NodeKind::Code
            })
        );
        assert!(matcher.matches(&expected, &expected.clone()));
    }

    #[test]
    fn test_mismatch_display() {
        let message = Mismatch::Kind {
            index: 3,
            left: NodeKind::Text,
            right: NodeKind::Style,
        }
        .to_string();
        assert_eq!(message, "node 3 differs in kind: text vs style");
    }
}
