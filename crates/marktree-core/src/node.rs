//! Node types produced by the parser.
//!
//! A parse returns a *forest*: an ordered `Vec<Node>` of root nodes. Every
//! node is either a text leaf or an interior node carrying a payload and its
//! children. The set of variants is closed so that code dispatching on node
//! kind (the tree matcher, renderers) gets exhaustiveness checking.
//!
//! Interior nodes are built bottom-up: a rule hands the parser a [`Branch`]
//! (the node without children), the parser parses the inner text and freezes
//! the children into the node with [`Branch::into_node`].

use serde::Serialize;

/// An ordered sequence of root-level nodes.
pub type Forest = Vec<Node>;

/// Style descriptor attached to a [`StyleNode`].
///
/// Descriptors are an opaque payload for the renderer. The default tree
/// matcher compares them by variant only, so `Heading(1)` and `Heading(2)`
/// are considered the same kind of style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// `**bold**`
    Bold,
    /// `*italic*` or `_italic_`
    Italic,
    /// `__underline__`
    Underline,
    /// `~~strikethrough~~`
    Strikethrough,
    /// Section heading with its level (1 for `#` and `===`).
    Heading(u8),
    /// A named class from a classed header line (`Title {red}`).
    Class(String),
    /// Code keyword.
    Keyword,
    /// Built-in type or constant in code.
    Builtin,
    /// String or numeric literal in code.
    Literal,
    /// Code comment.
    Comment,
    /// Name introduced by a definition (`struct Foo`).
    Definition,
    /// Function, field or property name in code.
    Identifier,
    /// Parameter list of a function declaration.
    Parameters,
    /// Annotations, decorators and generic arguments.
    Generic,
    /// Primitive type name.
    Type,
}

/// Identifies the concrete variant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Text,
    Style,
    ListItem,
    Code,
}

impl NodeKind {
    /// Every node kind, in declaration order.
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Text,
        NodeKind::Style,
        NodeKind::ListItem,
        NodeKind::Code,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Style => "style",
            NodeKind::ListItem => "list_item",
            NodeKind::Code => "code",
        }
    }
}

/// A single element of the parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Literal text run (leaf).
    Text(TextNode),
    /// Text decorated with one or more styles.
    Style(StyleNode),
    /// Markdown list item (`* item`).
    ListItem(ListItemNode),
    /// Code block or inline code span.
    Code(CodeNode),
}

/// Literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    pub content: String,
}

/// Decorated text: an ordered list of styles applied to the children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleNode {
    pub styles: Vec<Style>,
    pub children: Vec<Node>,
}

/// One item of a markdown list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ListItemNode {
    pub children: Vec<Node>,
}

/// Code content with its (optional) language tag.
///
/// `children` holds highlighted tokens when the language had a rule set
/// registered, and is empty for raw code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeNode {
    pub language: Option<String>,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl StyleNode {
    pub fn new(styles: Vec<Style>, children: Vec<Node>) -> Self {
        Self { styles, children }
    }

    /// Create a style node whose only child is a text node.
    pub fn wrap_text(content: impl Into<String>, styles: Vec<Style>) -> Self {
        Self {
            styles,
            children: vec![Node::text(content)],
        }
    }
}

impl CodeNode {
    /// Unhighlighted code.
    pub fn raw(language: Option<String>, body: impl Into<String>) -> Self {
        Self {
            language,
            body: body.into(),
            children: Vec::new(),
        }
    }
}

impl Node {
    /// Shorthand for `Node::Text(TextNode::new(content))`.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode::new(content))
    }

    /// Shorthand for a style node with the given children.
    pub fn styled(styles: Vec<Style>, children: Vec<Node>) -> Self {
        Node::Style(StyleNode::new(styles, children))
    }

    /// Shorthand for a list item with the given children.
    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem(ListItemNode { children })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Style(_) => NodeKind::Style,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::Code(_) => NodeKind::Code,
        }
    }

    /// Child nodes in order; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Style(node) => &node.children,
            Node::ListItem(node) => &node.children,
            Node::Code(node) => &node.children,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Concatenated text of this node and its descendants.
    ///
    /// Code nodes without highlighted children contribute their raw body.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Node::Text(node) => out.push_str(&node.content),
            Node::Code(node) if node.children.is_empty() => out.push_str(&node.body),
            _ => {
                for child in self.children() {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

impl From<TextNode> for Node {
    fn from(node: TextNode) -> Self {
        Node::Text(node)
    }
}

impl From<StyleNode> for Node {
    fn from(node: StyleNode) -> Self {
        Node::Style(node)
    }
}

impl From<ListItemNode> for Node {
    fn from(node: ListItemNode) -> Self {
        Node::ListItem(node)
    }
}

impl From<CodeNode> for Node {
    fn from(node: CodeNode) -> Self {
        Node::Code(node)
    }
}

/// Concatenated plain text of a whole forest.
pub fn forest_text(forest: &[Node]) -> String {
    forest.iter().map(Node::plain_text).collect()
}

/// An interior node that has not received its children yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    Style(Vec<Style>),
    ListItem,
}

impl Branch {
    /// Freeze `children` into the finished node.
    pub fn into_node(self, children: Vec<Node>) -> Node {
        match self {
            Branch::Style(styles) => Node::Style(StyleNode { styles, children }),
            Branch::ListItem => Node::ListItem(ListItemNode { children }),
        }
    }
}
