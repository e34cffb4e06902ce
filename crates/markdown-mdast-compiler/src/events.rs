//! Building event streams by hand.
//!
//! Tokenizers produce events with points already filled in. Tests, benches
//! and tools that synthesize events only know byte ranges; [`EventBuilder`]
//! turns those into points against the source and keeps enters and exits
//! paired:
//!
//! ```
//! use markdown_mdast_compiler::events::EventBuilder;
//!
//! let events = EventBuilder::new("a")
//!     .enter("paragraph", 0..1)
//!     .leaf("data", 0..1)
//!     .exit()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(events.len(), 4);
//! ```

use std::ops::Range;

use crate::error::{CompileError, Result};
use crate::point::Point;
use crate::token::{Event, Token, TokenType};

/// Point of byte `offset` in `source`.
///
/// Lines break at `\n`, `\r\n` and `\r`. Columns count characters. An offset
/// inside a multi-byte character counts that character as passed.
pub fn point_at(source: &str, offset: usize) -> Point {
    let mut line = 1;
    let mut column = 1;
    let mut chars = source
        .char_indices()
        .take_while(|&(index, _)| index < offset)
        .map(|(_, c)| c)
        .peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                column = 1;
            }
            _ => column += 1,
        }
    }

    Point::new(line, column, offset)
}

/// Accumulates events over a source string.
#[derive(Debug)]
pub struct EventBuilder<'a> {
    source: &'a str,
    events: Vec<Event>,
    open: Vec<Token>,
    error: Option<CompileError>,
}

impl<'a> EventBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            events: Vec::new(),
            open: Vec::new(),
            error: None,
        }
    }

    /// A token of `kind` spanning `range` of the source.
    pub fn token(&self, kind: impl Into<TokenType>, range: Range<usize>) -> Token {
        Token::new(
            kind,
            point_at(self.source, range.start),
            point_at(self.source, range.end),
        )
    }

    /// Open a token spanning `range`.
    pub fn enter(mut self, kind: impl Into<TokenType>, range: Range<usize>) -> Self {
        let kind = kind.into();
        if range.start > range.end
            || !self.source.is_char_boundary(range.start)
            || !self.source.is_char_boundary(range.end)
        {
            self.fail(format!(
                "`{kind}` range {range:?} does not fit a source of {} bytes",
                self.source.len()
            ));
            return self;
        }

        let token = self.token(kind, range);
        self.events.push(Event::enter(token.clone()));
        self.open.push(token);
        self
    }

    /// Close the innermost open token.
    pub fn exit(mut self) -> Self {
        match self.open.pop() {
            Some(token) => self.events.push(Event::exit(token)),
            None => self.fail("exit without an open token"),
        }
        self
    }

    /// Enter and immediately exit a token.
    pub fn leaf(self, kind: impl Into<TokenType>, range: Range<usize>) -> Self {
        self.enter(kind, range).exit()
    }

    /// Append events produced elsewhere, unchecked.
    pub fn extend(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// The events, if every token was closed and every range was valid.
    pub fn build(self) -> Result<Vec<Event>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(token) = self.open.last() {
            return Err(CompileError::invariant(format!(
                "`{}` is still open",
                token.kind
            )));
        }
        Ok(self.events)
    }

    /// The events built so far, open tokens included.
    pub fn build_unchecked(self) -> Vec<Event> {
        self.events
    }

    fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(CompileError::invariant(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", 2, Point::new(1, 3, 2))]
    #[case("a\nb", 2, Point::new(2, 1, 2))]
    #[case("a\r\nb", 3, Point::new(2, 1, 3))]
    #[case("a\rb\nc", 4, Point::new(3, 1, 4))]
    #[case("éa", 2, Point::new(1, 2, 2))]
    #[case("é", 1, Point::new(1, 2, 1))]
    #[case("ab", 9, Point::new(1, 3, 9))]
    fn points_from_offsets(#[case] source: &str, #[case] offset: usize, #[case] expected: Point) {
        assert_eq!(point_at(source, offset), expected);
    }

    #[test]
    fn enters_and_exits_pair_up() {
        let events = EventBuilder::new("ab")
            .enter("paragraph", 0..2)
            .leaf("data", 0..1)
            .leaf("data", 1..2)
            .exit()
            .build()
            .unwrap();

        let phases: Vec<_> = events
            .iter()
            .map(|event| (event.is_enter(), event.token.kind.as_str()))
            .collect();
        assert_eq!(
            phases,
            [
                (true, "paragraph"),
                (true, "data"),
                (false, "data"),
                (true, "data"),
                (false, "data"),
                (false, "paragraph"),
            ]
        );
        assert_eq!(events[5].token.end, Point::new(1, 3, 2));
    }

    #[test]
    fn unbalanced_builds_fail() {
        assert!(EventBuilder::new("a").enter("paragraph", 0..1).build().is_err());
        assert!(EventBuilder::new("a").exit().build().is_err());
        assert!(EventBuilder::new("a").leaf("data", 0..5).build().is_err());
    }

    #[test]
    fn tokens_inside_a_character_do_not_panic() {
        let token = EventBuilder::new("é").token("data", 0..1);
        assert_eq!(token.start, Point::new(1, 1, 0));
        assert_eq!(token.end, Point::new(1, 2, 1));
        assert!(EventBuilder::new("é").leaf("data", 0..1).build().is_err());
    }

    #[test]
    fn unchecked_build_keeps_open_tokens() {
        let events = EventBuilder::new("a")
            .enter("paragraph", 0..1)
            .build_unchecked();
        assert_eq!(events.len(), 1);
    }
}
