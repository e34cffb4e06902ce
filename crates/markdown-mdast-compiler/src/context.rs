//! The compile context: node stack, token stack and scratch data of one run.
//!
//! Handlers build the tree exclusively through this type:
//!
//! ```text
//! enter(paragraph)  stack: [root, paragraph]        tokens: [paragraph]
//! enterdata         stack: [root, paragraph, text]  tokens: [paragraph]
//! exitdata          stack: [root, paragraph]        tokens: [paragraph]
//! exit(paragraph)   stack: [root]                   tokens: []
//! ```
//!
//! Nodes are owned by the stack while open and appended to their parent's
//! children when they are popped. Only nodes opened with [`enter`] get a
//! token stack entry; fragments and reopened text nodes do not.
//!
//! [`enter`]: CompileContext::enter

use crate::config::{Config, OnEnterError, OnExitError};
use crate::error::{CompileError, Result};
use crate::point::{Point, Position, StartPoint};
use crate::stack::{Fragment, Pending, Stacked};
use crate::token::{SliceSerialize, Token, TokenType};
use crate::tree::{Node, ReferenceType, Root};

/// Numeric base of the character reference being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterReferenceType {
    /// `&#35;`
    Decimal,
    /// `&#x23;`
    Hexadecimal,
}

/// Facts handlers pass to each other across non-adjacent events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileData {
    /// An ordered list was entered; its first item value sets `start`.
    pub expecting_first_list_item_value: bool,
    /// The opening fence of fenced code was seen and its body is buffering.
    pub flow_code_inside: bool,
    /// The line ending between setext heading text and underline is dropped.
    pub setext_heading_slurp_line_ending: bool,
    /// The next line ending belongs to the preceding hard break.
    pub at_hard_break: bool,
    /// A link or image label was closed and no resource followed (yet).
    pub in_reference: bool,
    /// Kind of reference seen after the current label.
    pub reference_type: Option<ReferenceType>,
    /// Base of the numeric character reference being compiled, if any.
    pub character_reference_type: Option<CharacterReferenceType>,
}

struct OpenToken {
    token: Token,
    on_error: Option<OnEnterError>,
}

/// State of one compilation run.
pub struct CompileContext<'a> {
    config: &'a Config,
    source: &'a dyn SliceSerialize,
    from: StartPoint,
    stack: Vec<Stacked>,
    token_stack: Vec<OpenToken>,
    pub data: CompileData,
}

impl<'a> CompileContext<'a> {
    pub(crate) fn new(config: &'a Config, source: &'a dyn SliceSerialize, from: StartPoint) -> Self {
        let root = Root {
            children: Vec::new(),
            position: Position::at(from.point()),
        };

        Self {
            config,
            source,
            from,
            stack: vec![Stacked::Node(Node::Root(root))],
            token_stack: Vec::new(),
            data: CompileData::default(),
        }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// The source text `token` spans.
    pub fn slice_serialize(&self, token: &Token) -> Result<&'a str> {
        self.source.slice_serialize(token).ok_or_else(|| {
            CompileError::invariant(format!(
                "`{}` spans offsets {}..{}, outside the source",
                token.kind, token.start.offset, token.end.offset
            ))
        })
    }

    /// Copy a token point into a tree point.
    pub fn point(&self, point: &Point) -> Point {
        self.from.rebase(point)
    }

    pub fn position(&self, token: &Token) -> Position {
        self.from.rebase_position(&token.start, &token.end)
    }

    /// Open `node`: it becomes the insertion target until exited.
    pub fn enter(
        &mut self,
        node: impl Into<Node>,
        token: &Token,
        on_error: Option<OnEnterError>,
    ) -> Result<()> {
        self.enter_stacked(Stacked::Node(node.into()), token, on_error)
    }

    /// Open a link or image whose variant is decided when it is exited.
    pub fn enter_pending(&mut self, pending: Pending, token: &Token) -> Result<()> {
        self.enter_stacked(Stacked::Pending(pending), token, None)
    }

    fn enter_stacked(
        &mut self,
        mut entry: Stacked,
        token: &Token,
        on_error: Option<OnEnterError>,
    ) -> Result<()> {
        let parent = self.top()?;
        if !parent.is_parent() {
            return Err(CompileError::invariant(format!(
                "cannot enter `{}` into `{}`, which has no children",
                token.kind,
                parent.type_name()
            )));
        }

        let start = self.point(&token.start);
        if let Some(position) = entry.position_mut() {
            *position = Position::at(start);
        }

        self.stack.push(entry);
        self.token_stack.push(OpenToken {
            token: token.clone(),
            on_error,
        });
        Ok(())
    }

    /// Close the innermost open node with `token`.
    ///
    /// When the innermost open token has a different type, `on_error` runs
    /// if given, else the handler stored when the node was entered, else a
    /// [`CompileError::MismatchedToken`] is raised.
    pub fn exit(&mut self, token: &Token, on_error: Option<OnExitError>) -> Result<()> {
        let Some(open) = self.token_stack.pop() else {
            return Err(CompileError::UnopenedToken {
                token: token.kind.clone(),
                position: self.position(token),
            });
        };
        let mut entry = self.pop()?;

        if open.token.kind != token.kind {
            if let Some(on_error) = on_error {
                on_error(self, token, &open.token)?;
            } else if let Some(on_error) = open.on_error {
                on_error(self, Some(token), &open.token)?;
            } else {
                return Err(self.mismatch(token, &open.token));
            }
        }

        if matches!(entry, Stacked::Fragment(_)) {
            return Err(CompileError::invariant("unexpected fragment `exit`ed"));
        }

        let end = self.point(&token.end);
        if let Some(position) = entry.position_mut() {
            position.end = end;
        }

        self.attach(entry)
    }

    pub(crate) fn mismatch(&self, closing: &Token, open: &Token) -> CompileError {
        CompileError::MismatchedToken {
            closing: closing.kind.clone(),
            closing_position: self.position(closing),
            open: open.kind.clone(),
            open_position: self.position(open),
        }
    }

    /// Start capturing a sub-value.
    pub fn buffer(&mut self) {
        self.stack.push(Stacked::Fragment(Fragment::default()));
    }

    /// Stop capturing and return the captured text.
    pub fn resume(&mut self) -> Result<String> {
        Ok(self.pop()?.text_content())
    }

    /// Stop capturing and return the captured fragment itself.
    pub fn resume_fragment(&mut self) -> Result<Fragment> {
        match self.pop()? {
            Stacked::Fragment(fragment) => Ok(fragment),
            other => Err(CompileError::invariant(format!(
                "expected fragment on stack, found `{}`",
                other.type_name()
            ))),
        }
    }

    /// Push an entry without a token stack entry.
    pub fn push(&mut self, entry: impl Into<Stacked>) {
        self.stack.push(entry.into());
    }

    /// Pop the innermost entry. The root cannot be popped.
    pub fn pop(&mut self) -> Result<Stacked> {
        if self.stack.len() <= 1 {
            return Err(CompileError::invariant("expected node on stack"));
        }
        self.stack
            .pop()
            .ok_or_else(|| CompileError::invariant("expected node on stack"))
    }

    /// Append a popped entry to the innermost open parent.
    pub fn attach(&mut self, entry: Stacked) -> Result<()> {
        let node = entry.into_node()?;
        let parent = self.top_mut()?;
        let parent_type = parent.type_name().to_string();
        let children = parent.children_mut().ok_or_else(|| {
            CompileError::invariant(format!(
                "expected parent on stack, found `{parent_type}`"
            ))
        })?;
        children.push(node);
        Ok(())
    }

    pub fn top(&self) -> Result<&Stacked> {
        self.stack
            .last()
            .ok_or_else(|| CompileError::invariant("expected node on stack"))
    }

    pub fn top_mut(&mut self) -> Result<&mut Stacked> {
        self.stack
            .last_mut()
            .ok_or_else(|| CompileError::invariant("expected node on stack"))
    }

    /// Children of the innermost entry, which must be a parent.
    pub fn children_mut(&mut self) -> Result<&mut Vec<Node>> {
        let top = self.top_mut()?;
        if !top.is_parent() {
            let found = top.type_name().to_string();
            return Err(CompileError::invariant(format!(
                "expected parent on stack, found `{found}`"
            )));
        }
        top.children_mut()
            .ok_or_else(|| CompileError::invariant("expected parent on stack"))
    }

    /// The entry `depth` levels below the top (`0` is the top itself).
    pub fn ancestor_mut(&mut self, depth: usize) -> Result<&mut Stacked> {
        let index = self
            .stack
            .len()
            .checked_sub(depth + 1)
            .ok_or_else(|| CompileError::invariant("expected ancestor on stack"))?;
        Ok(&mut self.stack[index])
    }

    /// The innermost entry as a tree node.
    pub fn top_node_mut(&mut self) -> Result<&mut Node> {
        let top = self.top_mut()?;
        let found = top.type_name().to_string();
        top.as_node_mut()
            .ok_or_else(|| CompileError::invariant(format!("expected node on stack, found `{found}`")))
    }

    /// The entry `depth` levels below the top, as a pending link or image.
    pub fn pending_mut(&mut self, depth: usize) -> Result<&mut Pending> {
        let entry = self.ancestor_mut(depth)?;
        let found = entry.type_name().to_string();
        entry.as_pending_mut().ok_or_else(|| {
            CompileError::invariant(format!("expected image or link on stack, found `{found}`"))
        })
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn token_stack_len(&self) -> usize {
        self.token_stack.len()
    }

    /// Type of the innermost open token.
    pub fn open_token(&self) -> Option<&TokenType> {
        self.token_stack.last().map(|open| &open.token.kind)
    }

    /// Run the stored handler of the innermost token still open at the end
    /// of the document, or fail.
    pub(crate) fn close_document(&mut self) -> Result<()> {
        let Some(open) = self.token_stack.pop() else {
            return Ok(());
        };

        match open.on_error {
            Some(on_error) => {
                log::warn!(
                    "document ended with `{}` open; its handler takes over",
                    open.token.kind
                );
                on_error(self, None, &open.token)
            }
            None => Err(CompileError::UnclosedToken {
                token: open.token.kind.clone(),
                position: self.position(&open.token),
            }),
        }
    }

    /// Attach every open node to its parent and hand out the root.
    pub(crate) fn finish(mut self) -> Result<Root> {
        while self.stack.len() > 1 {
            let entry = self.pop()?;
            if matches!(entry, Stacked::Fragment(_)) {
                continue;
            }
            self.attach(entry)?;
        }

        match self.stack.pop() {
            Some(Stacked::Node(Node::Root(root))) => Ok(root),
            _ => Err(CompileError::invariant("expected root at the bottom of the stack")),
        }
    }
}
