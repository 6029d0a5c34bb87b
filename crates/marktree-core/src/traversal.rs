//! Depth-first walks over a forest.
//!
//! Both walks visit every node exactly once, left to right, and never mutate
//! the tree. Recursion depth equals tree depth.

use crate::node::Node;

/// Visit each node before its children.
pub fn traverse_pre_order<'a, F>(forest: &'a [Node], mut visit: F)
where
    F: FnMut(&'a Node),
{
    for node in forest {
        pre_order_subtree(node, &mut visit);
    }
}

/// Visit each node after all of its children.
pub fn traverse_post_order<'a, F>(forest: &'a [Node], mut visit: F)
where
    F: FnMut(&'a Node),
{
    for node in forest {
        post_order_subtree(node, &mut visit);
    }
}

/// Collect the forest's nodes in pre-order.
pub fn pre_order(forest: &[Node]) -> Vec<&Node> {
    let mut nodes = Vec::new();
    traverse_pre_order(forest, |node| nodes.push(node));
    nodes
}

/// Collect the forest's nodes in post-order.
pub fn post_order(forest: &[Node]) -> Vec<&Node> {
    let mut nodes = Vec::new();
    traverse_post_order(forest, |node| nodes.push(node));
    nodes
}

fn pre_order_subtree<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    visit(node);
    for child in node.children() {
        pre_order_subtree(child, visit);
    }
}

fn post_order_subtree<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    for child in node.children() {
        post_order_subtree(child, visit);
    }
    visit(node);
}
