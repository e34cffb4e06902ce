//! Entry point: turn a complete event stream into a tree.

use crate::config::{Config, ExtensionEntry};
use crate::context::CompileContext;
use crate::error::Result;
use crate::list::prepare_lists;
use crate::point::{Point, StartPoint};
use crate::token::{Event, Phase, SliceSerialize};
use crate::tree::Root;

/// Compiler configuration.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Point the markdown value starts at, when it was cut out of a larger
    /// document. Defaults to `1:1` (offset `0`).
    pub from: Option<Point>,
    /// Extensions, applied in order after the CommonMark handlers.
    pub extensions: Vec<ExtensionEntry>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_at(mut self, point: Point) -> Self {
        self.from = Some(point);
        self
    }

    pub fn extension(mut self, extension: impl Into<ExtensionEntry>) -> Self {
        self.extensions.push(extension.into());
        self
    }
}

/// Compiles event streams with one fixed configuration.
///
/// The configuration is merged once, in [`Compiler::new`]; every
/// [`compile`](Compiler::compile) call then starts from empty stacks, so one
/// compiler can be reused for any number of documents.
#[derive(Debug, Clone)]
pub struct Compiler {
    config: Config,
    from: StartPoint,
}

impl Compiler {
    pub fn new(options: Options) -> Self {
        let Options { from, extensions } = options;
        let mut config = Config::commonmark();
        config.configure(extensions);

        Self {
            config,
            from: from.map(StartPoint::new).unwrap_or_default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compile the complete event stream of one document.
    ///
    /// `source` is the text the events' offsets point into.
    pub fn compile<S>(&self, events: Vec<Event>, source: &S) -> Result<Root>
    where
        S: SliceSerialize + ?Sized,
    {
        log::debug!(
            "compiling {} event(s) with {} enter and {} exit handler(s)",
            events.len(),
            self.config.enter.len(),
            self.config.exit.len()
        );

        let events = prepare_lists(events)?;
        let mut context = CompileContext::new(&self.config, &source, self.from);

        for event in &events {
            let handles = match event.phase {
                Phase::Enter => &self.config.enter,
                Phase::Exit => &self.config.exit,
            };
            if let Some(handle) = handles.get(&event.token.kind) {
                handle(&mut context, &event.token)?;
            }
        }

        context.close_document()?;
        let mut tree = context.finish()?;

        if let Some(first) = events.first() {
            let last = events
                .len()
                .checked_sub(2)
                .and_then(|index| events.get(index))
                .unwrap_or(first);
            tree.position = self
                .from
                .rebase_position(&first.token.start, &last.token.end);
        }

        for transform in &self.config.transforms {
            if let Some(replacement) = transform(&mut tree) {
                tree = replacement;
            }
        }

        log::debug!("compiled {} top-level node(s)", tree.children.len());
        Ok(tree)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Compile `events` over `source` with a one-off compiler.
pub fn compile(events: Vec<Event>, source: &str, options: Options) -> Result<Root> {
    Compiler::new(options).compile(events, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Extension, on_enter_error};
    use crate::events::EventBuilder;
    use crate::point::Position;
    use crate::tree::{Node, Paragraph, Text};

    fn paragraph(source: &str) -> Vec<Event> {
        EventBuilder::new(source)
            .enter("paragraph", 0..source.len())
            .leaf("data", 0..source.len())
            .exit()
            .build()
            .unwrap()
    }

    #[test]
    fn empty_stream_yields_empty_root_at_start() {
        let from = Point::new(3, 2, 10);
        let tree = compile(Vec::new(), "", Options::new().start_at(from)).unwrap();
        assert_eq!(tree, Root {
            children: Vec::new(),
            position: Position::at(from),
        });
    }

    #[test]
    fn root_spans_first_start_to_second_to_last_end() {
        let source = "abc";
        let events = EventBuilder::new(source)
            .enter("paragraph", 0..3)
            .leaf("data", 0..2)
            .exit()
            .build()
            .unwrap();

        let tree = compile(events, source, Options::default()).unwrap();
        assert_eq!(tree.position, Position::new(Point::new(1, 1, 0), Point::new(1, 3, 2)));
        assert_eq!(tree.children[0].position().end.offset, 3);
    }

    #[test]
    fn single_event_root_uses_that_event() {
        let source = "a";
        let events = vec![Event::enter(EventBuilder::new(source).token("whitespace", 0..1))];
        let tree = compile(events, source, Options::default()).unwrap();
        assert_eq!(tree.position, Position::new(Point::new(1, 1, 0), Point::new(1, 2, 1)));
        assert!(tree.children.is_empty());
    }

    #[test]
    fn unclosed_token_fails_without_handler() {
        let source = "a";
        let events = EventBuilder::new(source)
            .enter("paragraph", 0..1)
            .build_unchecked();

        let error = compile(events, source, Options::default()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Cannot close document, a token (`paragraph`, 1:1-1:2) is still open"
        );
    }

    #[test]
    fn unclosed_token_handler_can_recover() {
        let source = "a";
        let events = EventBuilder::new(source)
            .enter("paragraph", 0..1)
            .leaf("data", 0..1)
            .build_unchecked();

        let extension = Extension::new().on_enter("paragraph", |context, token| {
            let recover = on_enter_error(|_, closing, open| {
                assert!(closing.is_none());
                assert_eq!(open.kind.as_str(), "paragraph");
                Ok(())
            });
            context.enter(Paragraph::default(), token, Some(recover))
        });

        let tree = compile(events, source, Options::new().extension(extension)).unwrap();
        let Node::Paragraph(paragraph) = &tree.children[0] else {
            panic!("expected a paragraph, got {:?}", tree.children);
        };
        assert_eq!(paragraph.children, [Node::Text(Text {
            value: "a".to_string(),
            position: Position::new(Point::new(1, 1, 0), Point::new(1, 2, 1)),
        })]);
    }

    #[test]
    fn transforms_replace_or_mutate_in_order() {
        let source = "a";
        let extension = Extension::new()
            .transform(|tree| {
                tree.children.clear();
                None
            })
            .transform(|tree| {
                assert!(tree.children.is_empty());
                Some(Root {
                    children: vec![Text::new("replaced").into()],
                    position: tree.position,
                })
            });

        let tree = compile(paragraph(source), source, Options::new().extension(extension)).unwrap();
        assert_eq!(tree.text_content(), "replaced");
        assert_eq!(tree.position.end.offset, 1);
    }

    #[test]
    fn transforms_from_separate_extensions_run_in_order() {
        let source = "a";
        let first = Extension::new().transform(|tree| {
            tree.children.push(Text::new("b").into());
            None
        });
        let second = Extension::new().transform(|tree| {
            assert_eq!(tree.children.len(), 2);
            tree.children.push(Text::new("c").into());
            None
        });

        let options = Options::new().extension(first).extension(second);
        let tree = compile(paragraph(source), source, options).unwrap();
        assert_eq!(tree.text_content(), "abc");
    }

    #[test]
    fn compiler_is_reusable() {
        let compiler = Compiler::default();
        let first = compiler.compile(paragraph("a"), "a").unwrap();
        let second = compiler.compile(paragraph("a"), &String::from("a")).unwrap();
        assert_eq!(first, second);
    }
}
