//! Entries of the compiler's node stack.
//!
//! Besides real tree nodes, the stack holds two kinds of scaffolding that
//! never reach the tree as-is:
//!
//! - [`Fragment`]: collects children or text for a sub-value (a code fence's
//!   info string, a link label) that a handler reads back with `resume`.
//! - [`Pending`]: a link or image whose final variant is not known until its
//!   closing token. It gathers label, destination and reference facts while
//!   open, and becomes exactly one tree node when exited.

use crate::error::{CompileError, Result};
use crate::point::Position;
use crate::tree::{Image, ImageReference, Link, LinkReference, Node, ReferenceType};

/// Temporary parent used to capture a sub-value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Link,
    Image,
}

/// A link or image under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub kind: PendingKind,
    pub children: Vec<Node>,
    pub alt: Option<String>,
    pub url: String,
    pub title: Option<String>,
    /// Decoded label, kept in case this turns out to be a reference.
    pub label: Option<String>,
    /// Normalized label, kept for the same reason.
    pub identifier: Option<String>,
    /// Set when the closing handler resolved this to a reference.
    pub reference_type: Option<ReferenceType>,
    pub position: Position,
}

impl Pending {
    pub fn new(kind: PendingKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            alt: None,
            url: String::new(),
            title: None,
            label: None,
            identifier: None,
            reference_type: None,
            position: Position::default(),
        }
    }

    pub fn link() -> Self {
        Self::new(PendingKind::Link)
    }

    pub fn image() -> Self {
        Self::new(PendingKind::Image)
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            PendingKind::Link => "link",
            PendingKind::Image => "image",
        }
    }

    /// Materialize the variant decided by `reference_type`.
    pub fn into_node(self) -> Node {
        let Pending {
            kind,
            children,
            alt,
            url,
            title,
            label,
            identifier,
            reference_type,
            position,
        } = self;

        match (kind, reference_type) {
            (PendingKind::Link, None) => Link {
                children,
                title,
                url,
                position,
            }
            .into(),
            (PendingKind::Link, Some(reference_type)) => LinkReference {
                children,
                identifier: identifier.unwrap_or_default(),
                label,
                reference_type,
                position,
            }
            .into(),
            (PendingKind::Image, None) => Image {
                alt,
                title,
                url,
                position,
            }
            .into(),
            (PendingKind::Image, Some(reference_type)) => ImageReference {
                alt,
                identifier: identifier.unwrap_or_default(),
                label,
                reference_type,
                position,
            }
            .into(),
        }
    }
}

/// One entry of the node stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Stacked {
    Node(Node),
    Fragment(Fragment),
    Pending(Pending),
}

impl Stacked {
    /// The mdast type name, `fragment` for fragments.
    pub fn type_name(&self) -> &str {
        match self {
            Stacked::Node(node) => node.type_name(),
            Stacked::Fragment(_) => "fragment",
            Stacked::Pending(pending) => pending.type_name(),
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Stacked::Node(node) => node.children_mut(),
            Stacked::Fragment(fragment) => Some(&mut fragment.children),
            Stacked::Pending(pending) if pending.kind == PendingKind::Link => {
                Some(&mut pending.children)
            }
            Stacked::Pending(_) => None,
        }
    }

    pub fn is_parent(&self) -> bool {
        match self {
            Stacked::Node(node) => node.is_parent(),
            Stacked::Fragment(_) => true,
            Stacked::Pending(pending) => pending.kind == PendingKind::Link,
        }
    }

    pub fn position_mut(&mut self) -> Option<&mut Position> {
        match self {
            Stacked::Node(node) => Some(node.position_mut()),
            Stacked::Fragment(_) => None,
            Stacked::Pending(pending) => Some(&mut pending.position),
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Stacked::Node(node) => node.text_content(),
            Stacked::Fragment(fragment) => fragment.text_content(),
            Stacked::Pending(pending) => match pending.kind {
                PendingKind::Image => pending.alt.clone().unwrap_or_default(),
                PendingKind::Link => {
                    let mut out = String::new();
                    for child in &pending.children {
                        child.collect_text(&mut out);
                    }
                    out
                }
            },
        }
    }

    /// Turn this entry into the tree node it stands for.
    pub fn into_node(self) -> Result<Node> {
        match self {
            Stacked::Node(node) => Ok(node),
            Stacked::Pending(pending) => Ok(pending.into_node()),
            Stacked::Fragment(_) => Err(CompileError::invariant(
                "a fragment cannot become part of the tree",
            )),
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Stacked::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_pending_mut(&mut self) -> Option<&mut Pending> {
        match self {
            Stacked::Pending(pending) => Some(pending),
            _ => None,
        }
    }
}

impl From<Node> for Stacked {
    fn from(node: Node) -> Self {
        Stacked::Node(node)
    }
}

impl From<Fragment> for Stacked {
    fn from(fragment: Fragment) -> Self {
        Stacked::Fragment(fragment)
    }
}

impl From<Pending> for Stacked {
    fn from(pending: Pending) -> Self {
        Stacked::Pending(pending)
    }
}
