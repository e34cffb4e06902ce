//! Handler tables and how extensions are merged into them.
//!
//! A [`Config`] maps token types to the handlers that run when a token of
//! that type is entered or exited. The compiler starts from the CommonMark
//! table ([`Config::commonmark`]) and folds every [`Extension`] into it, in
//! the order given:
//!
//! - `enter`/`exit`: a later handler for the same token type replaces the
//!   earlier one; handlers for other types are added.
//! - `can_contain_eols`/`transforms`: appended, keeping order and duplicates.
//!
//! Handlers are not validated. An extension that registers an enter handler
//! without the matching exit handler only shows up at compile time, as a
//! stack discipline error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::CompileContext;
use crate::error::Result;
use crate::token::{Token, TokenType};
use crate::tree::Root;

/// Runs when a token of the registered type is entered or exited.
pub type Handle = Arc<dyn Fn(&mut CompileContext<'_>, &Token) -> Result<()> + Send + Sync>;

/// Runs when the token a node was entered with is closed by a different
/// token (`Some(closing)`), or is still open at the end of the document
/// (`None`). The second argument is the open token.
pub type OnEnterError =
    Arc<dyn Fn(&mut CompileContext<'_>, Option<&Token>, &Token) -> Result<()> + Send + Sync>;

/// Runs when an exit closes something other than the innermost open token.
/// Arguments are the closing token, then the open one.
pub type OnExitError =
    Arc<dyn Fn(&mut CompileContext<'_>, &Token, &Token) -> Result<()> + Send + Sync>;

/// Changes the tree after compilation.
///
/// Mutate the tree in place and return `None`, or return a replacement.
pub type Transform = Arc<dyn Fn(&mut Root) -> Option<Root> + Send + Sync>;

/// Wrap a closure as a [`Handle`].
pub fn handle<F>(f: F) -> Handle
where
    F: Fn(&mut CompileContext<'_>, &Token) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`OnEnterError`].
pub fn on_enter_error<F>(f: F) -> OnEnterError
where
    F: Fn(&mut CompileContext<'_>, Option<&Token>, &Token) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`OnExitError`].
pub fn on_exit_error<F>(f: F) -> OnExitError
where
    F: Fn(&mut CompileContext<'_>, &Token, &Token) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Effective configuration of a compiler.
#[derive(Clone, Default)]
pub struct Config {
    pub enter: HashMap<TokenType, Handle>,
    pub exit: HashMap<TokenType, Handle>,
    /// Node types (mdast `type` names) in which line endings become text.
    pub can_contain_eols: Vec<String>,
    pub transforms: Vec<Transform>,
}

impl Config {
    /// The CommonMark handler table, without extensions.
    pub fn commonmark() -> Self {
        crate::handle::commonmark()
    }

    /// Merge one extension into this configuration.
    pub fn merge(&mut self, extension: Extension) {
        let Extension {
            enter,
            exit,
            can_contain_eols,
            transforms,
        } = extension;

        self.enter.extend(enter);
        self.exit.extend(exit);
        self.can_contain_eols.extend(can_contain_eols);
        self.transforms.extend(transforms);
    }

    /// Merge extensions (and nested groups of extensions) in order.
    pub fn configure(&mut self, entries: impl IntoIterator<Item = ExtensionEntry>) {
        for entry in entries {
            match entry {
                ExtensionEntry::Single(extension) => self.merge(extension),
                ExtensionEntry::Group(group) => self.configure(group),
            }
        }
    }

    /// Whether line endings directly inside a node of type `name` become text.
    pub fn can_contain_eols(&self, name: &str) -> bool {
        self.can_contain_eols.iter().any(|eol| eol == name)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("enter", &sorted_keys(&self.enter))
            .field("exit", &sorted_keys(&self.exit))
            .field("can_contain_eols", &self.can_contain_eols)
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

fn sorted_keys(handles: &HashMap<TokenType, Handle>) -> Vec<&str> {
    let mut keys: Vec<&str> = handles.keys().map(TokenType::as_str).collect();
    keys.sort_unstable();
    keys
}

/// A partial configuration supplied by a third party.
///
/// ```
/// use markdown_mdast_compiler::config::Extension;
/// use markdown_mdast_compiler::tree::{Custom, Node};
///
/// let extension = Extension::new()
///     .on_enter("strikethrough", |context, token| {
///         context.enter(Custom::parent("delete"), token, None)
///     })
///     .on_exit("strikethrough", |context, token| context.exit(token, None))
///     .can_contain_eol("delete");
/// # let _ = extension;
/// ```
#[derive(Clone, Default)]
pub struct Extension {
    pub enter: HashMap<TokenType, Handle>,
    pub exit: HashMap<TokenType, Handle>,
    pub can_contain_eols: Vec<String>,
    pub transforms: Vec<Transform>,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F>(mut self, kind: impl Into<TokenType>, f: F) -> Self
    where
        F: Fn(&mut CompileContext<'_>, &Token) -> Result<()> + Send + Sync + 'static,
    {
        self.enter.insert(kind.into(), handle(f));
        self
    }

    pub fn on_exit<F>(mut self, kind: impl Into<TokenType>, f: F) -> Self
    where
        F: Fn(&mut CompileContext<'_>, &Token) -> Result<()> + Send + Sync + 'static,
    {
        self.exit.insert(kind.into(), handle(f));
        self
    }

    pub fn can_contain_eol(mut self, name: impl Into<String>) -> Self {
        self.can_contain_eols.push(name.into());
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Root) -> Option<Root> + Send + Sync + 'static,
    {
        self.transforms.push(Arc::new(f));
        self
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("enter", &sorted_keys(&self.enter))
            .field("exit", &sorted_keys(&self.exit))
            .field("can_contain_eols", &self.can_contain_eols)
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

/// An extension, or a list of extensions that travel together.
#[derive(Debug, Clone)]
pub enum ExtensionEntry {
    Single(Extension),
    Group(Vec<ExtensionEntry>),
}

impl From<Extension> for ExtensionEntry {
    fn from(extension: Extension) -> Self {
        Self::Single(extension)
    }
}

impl From<Vec<Extension>> for ExtensionEntry {
    fn from(extensions: Vec<Extension>) -> Self {
        Self::Group(extensions.into_iter().map(Self::Single).collect())
    }
}
