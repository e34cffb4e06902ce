//! The mdast syntax tree.
//!
//! Nodes come in two structural flavors: *parents* own an ordered list of
//! `children`, *literals* own a `value`. A few nodes (break, thematic break,
//! image) are neither. Every node carries a [`Position`].
//!
//! Serialization follows the mdast shape: a `type` tag in camelCase plus the
//! node's fields, so a serialized tree can be compared against other mdast
//! producers.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::point::Position;

/// How a reference link or image names its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    /// `[a]`: the label is also the identifier.
    Shortcut,
    /// `[a][]`: explicit but empty second label.
    Collapsed,
    /// `[a][b]`: explicit second label.
    Full,
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shortcut => "shortcut",
            Self::Collapsed => "collapsed",
            Self::Full => "full",
        })
    }
}

/// Document root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Root {
    pub children: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Blockquote {
    pub children: Vec<Node>,
    pub position: Position,
}

/// Hard line break.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Break {
    pub position: Position,
}

/// Fenced or indented code block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Code {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    pub value: String,
    pub position: Position,
}

/// Link reference definition (`[a]: b "c"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Definition {
    /// Normalized label, used for matching references.
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Emphasis {
    pub children: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Heading {
    /// Rank, `1` to `6`.
    pub depth: u8,
    pub children: Vec<Node>,
    pub position: Position,
}

/// Raw HTML, flow or text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Html {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub reference_type: ReferenceType,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InlineCode {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Link {
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkReference {
    pub children: Vec<Node>,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub reference_type: ReferenceType,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    /// Whether any item is separated from its siblings by a blank line.
    pub spread: bool,
    /// Number of the first item of an ordered list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    pub children: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Whether the item's content is separated by blank lines.
    pub spread: bool,
    pub children: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paragraph {
    pub children: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Strong {
    pub children: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Text {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThematicBreak {
    pub position: Position,
}

/// A node introduced by an extension.
///
/// It is a parent when `children` is set and a literal when `value` is set.
/// Serialized with `name` as its `type`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Custom {
    pub name: String,
    pub children: Option<Vec<Node>>,
    pub value: Option<String>,
    pub position: Position,
}

impl Serialize for Custom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.children.is_some()) + usize::from(self.value.is_some());
        let mut state = serializer.serialize_struct("Custom", len)?;
        state.serialize_field("type", &self.name)?;
        match &self.children {
            Some(children) => state.serialize_field("children", children)?,
            None => state.skip_field("children")?,
        }
        match &self.value {
            Some(value) => state.serialize_field("value", value)?,
            None => state.skip_field("value")?,
        }
        state.serialize_field("position", &self.position)?;
        state.end()
    }
}

impl Custom {
    pub fn parent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(String::new()),
            ..Default::default()
        }
    }

    pub fn void(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Any mdast node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root(Root),
    Blockquote(Blockquote),
    Break(Break),
    Code(Code),
    Definition(Definition),
    Emphasis(Emphasis),
    Heading(Heading),
    Html(Html),
    Image(Image),
    ImageReference(ImageReference),
    InlineCode(InlineCode),
    Link(Link),
    LinkReference(LinkReference),
    List(List),
    ListItem(ListItem),
    Paragraph(Paragraph),
    Strong(Strong),
    Text(Text),
    ThematicBreak(ThematicBreak),
    #[serde(untagged)]
    Custom(Custom),
}

macro_rules! node_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Node {
                fn from(node: $variant) -> Self {
                    Node::$variant(node)
                }
            }
        )*

        impl Node {
            pub fn position(&self) -> &Position {
                match self {
                    $(Node::$variant(node) => &node.position,)*
                }
            }

            pub fn position_mut(&mut self) -> &mut Position {
                match self {
                    $(Node::$variant(node) => &mut node.position,)*
                }
            }
        }
    };
}

node_from!(
    Root,
    Blockquote,
    Break,
    Code,
    Definition,
    Emphasis,
    Heading,
    Html,
    Image,
    ImageReference,
    InlineCode,
    Link,
    LinkReference,
    List,
    ListItem,
    Paragraph,
    Strong,
    Text,
    ThematicBreak,
    Custom,
);

impl Node {
    /// The mdast `type` of this node.
    pub fn type_name(&self) -> &str {
        match self {
            Node::Root(_) => "root",
            Node::Blockquote(_) => "blockquote",
            Node::Break(_) => "break",
            Node::Code(_) => "code",
            Node::Definition(_) => "definition",
            Node::Emphasis(_) => "emphasis",
            Node::Heading(_) => "heading",
            Node::Html(_) => "html",
            Node::Image(_) => "image",
            Node::ImageReference(_) => "imageReference",
            Node::InlineCode(_) => "inlineCode",
            Node::Link(_) => "link",
            Node::LinkReference(_) => "linkReference",
            Node::List(_) => "list",
            Node::ListItem(_) => "listItem",
            Node::Paragraph(_) => "paragraph",
            Node::Strong(_) => "strong",
            Node::Text(_) => "text",
            Node::ThematicBreak(_) => "thematicBreak",
            Node::Custom(node) => &node.name,
        }
    }

    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Root(node) => Some(&node.children),
            Node::Blockquote(node) => Some(&node.children),
            Node::Emphasis(node) => Some(&node.children),
            Node::Heading(node) => Some(&node.children),
            Node::Link(node) => Some(&node.children),
            Node::LinkReference(node) => Some(&node.children),
            Node::List(node) => Some(&node.children),
            Node::ListItem(node) => Some(&node.children),
            Node::Paragraph(node) => Some(&node.children),
            Node::Strong(node) => Some(&node.children),
            Node::Custom(node) => node.children.as_ref(),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(node) => Some(&mut node.children),
            Node::Blockquote(node) => Some(&mut node.children),
            Node::Emphasis(node) => Some(&mut node.children),
            Node::Heading(node) => Some(&mut node.children),
            Node::Link(node) => Some(&mut node.children),
            Node::LinkReference(node) => Some(&mut node.children),
            Node::List(node) => Some(&mut node.children),
            Node::ListItem(node) => Some(&mut node.children),
            Node::Paragraph(node) => Some(&mut node.children),
            Node::Strong(node) => Some(&mut node.children),
            Node::Custom(node) => node.children.as_mut(),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Code(node) => Some(&node.value),
            Node::Html(node) => Some(&node.value),
            Node::InlineCode(node) => Some(&node.value),
            Node::Text(node) => Some(&node.value),
            Node::Custom(node) => node.value.as_deref(),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut String> {
        match self {
            Node::Code(node) => Some(&mut node.value),
            Node::Html(node) => Some(&mut node.value),
            Node::InlineCode(node) => Some(&mut node.value),
            Node::Text(node) => Some(&mut node.value),
            Node::Custom(node) => node.value.as_mut(),
            _ => None,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.children().is_some()
    }

    /// Append the plain-text content of this node to `out`.
    ///
    /// Literals contribute their value, images their alt text, parents the
    /// content of their children.
    pub fn collect_text(&self, out: &mut String) {
        if let Some(value) = self.value() {
            out.push_str(value);
            return;
        }

        match self {
            Node::Image(Image { alt: Some(alt), .. })
            | Node::ImageReference(ImageReference { alt: Some(alt), .. }) => out.push_str(alt),
            _ => {
                for child in self.children().into_iter().flatten() {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }
}

impl Root {
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

impl List {
    pub fn new(ordered: bool, spread: bool) -> Self {
        Self {
            ordered,
            spread,
            ..Default::default()
        }
    }
}

impl ListItem {
    pub fn new(spread: bool) -> Self {
        Self {
            spread,
            ..Default::default()
        }
    }
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }
}
