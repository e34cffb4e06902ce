//! # markdown-mdast-compiler
//!
//! Compiles the event stream of a CommonMark tokenizer into an [mdast]
//! syntax tree with positional info on every node.
//!
//! [mdast]: https://github.com/syntax-tree/mdast
//!
//! ## What does the compiler do?
//!
//! A CommonMark tokenizer does not build a tree. It emits a flat, ordered
//! list of events, each entering or exiting a typed span of the source
//! (a [`Token`]). The compiler walks that list once and turns it into nodes:
//!
//! ```text
//! Events → List preparation → Handler dispatch → Transforms → Root
//!          (listItem tokens,   (stack of open    (extension
//!           loose/tight)        nodes)             rewrites)
//! ```
//!
//! ### 1. List preparation ([`list`] module)
//!
//! Tokenizers do not mark where list items end, or whether a list is loose.
//! Each list's events are rewritten to wrap every item in a `listItem`
//! token carrying a `spread` flag.
//!
//! ### 2. Handler dispatch ([`compiler`] and [`context`] modules)
//!
//! Every event is routed to the handler registered for its token type and
//! phase. Handlers open and close nodes on a [`CompileContext`]: a stack of
//! open nodes (plus temporary buffers for sub-values such as a code fence's
//! info string) and a stack of the tokens that opened them. A closing token
//! that does not match the innermost open one aborts the run.
//!
//! ### 3. Transforms ([`config`] module)
//!
//! Extensions can register handlers for their own token types and tree
//! transforms that run, in order, on the finished tree.
//!
//! ## Module Structure
//!
//! ```text
//! markdown-mdast-compiler/
//! ├── lib.rs        # This file - public API
//! ├── compiler.rs   # Compiler, Options, compile()
//! ├── config.rs     # Handler tables, extensions and how they merge
//! ├── context.rs    # CompileContext: the stack engine handlers work on
//! ├── stack.rs      # Stack entries: nodes, fragments, pending links/images
//! ├── list.rs       # listItem synthesis and spread inference
//! ├── handle/       # The CommonMark handlers
//! ├── decode.rs     # Character references and identifier normalization
//! ├── events.rs     # EventBuilder for synthesizing event streams
//! ├── token.rs      # Token types, tokens, events
//! ├── tree.rs       # mdast nodes
//! ├── point.rs      # Points, positions and rebasing
//! └── error.rs      # CompileError
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_mdast_compiler::events::EventBuilder;
//! use markdown_mdast_compiler::tree::Node;
//! use markdown_mdast_compiler::{Options, compile};
//!
//! let source = "*a*";
//! let events = EventBuilder::new(source)
//!     .enter("paragraph", 0..3)
//!     .enter("emphasis", 0..3)
//!     .leaf("emphasisSequence", 0..1)
//!     .enter("emphasisText", 1..2)
//!     .leaf("data", 1..2)
//!     .exit()
//!     .leaf("emphasisSequence", 2..3)
//!     .exit()
//!     .exit()
//!     .build()
//!     .unwrap();
//!
//! let tree = compile(events, source, Options::default()).unwrap();
//!
//! let Node::Paragraph(paragraph) = &tree.children[0] else { panic!() };
//! assert_eq!(paragraph.children[0].type_name(), "emphasis");
//! assert_eq!(tree.text_content(), "a");
//! ```

pub mod compiler;
pub mod config;
pub mod context;
pub mod decode;
pub mod error;
pub mod events;
mod handle;
pub mod list;
pub mod point;
pub mod stack;
pub mod token;
pub mod tree;

pub use compiler::{Compiler, Options, compile};
pub use config::{Config, Extension, ExtensionEntry, Handle, OnEnterError, OnExitError, Transform};
pub use context::{CompileContext, CompileData};
pub use error::{CompileError, Result};
pub use point::{Point, Position};
pub use token::{Event, Phase, SliceSerialize, Token, TokenType};
pub use tree::{Node, Root};
