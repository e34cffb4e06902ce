//! List item synthesis and loose/tight inference.
//!
//! Tokenizers emit a list as one flat run between `enter(list)` and
//! `exit(list)`: item prefixes, content and line endings, with no token
//! around each item. Before handlers run, every list is rewritten so that
//! each item is wrapped in a `listItem` token:
//!
//! ```text
//! Enter(listUnordered)           Enter(listUnordered)
//!   Enter(listItemPrefix)          Enter(listItem)
//!   ..                               Enter(listItemPrefix)
//!   Enter(paragraph) ..              ..
//!   Enter(lineEnding) ..             Enter(paragraph) ..
//!   Enter(listItemPrefix)   =>     Exit(listItem)
//!   ..                             Enter(lineEnding) ..
//! Exit(listUnordered)              Enter(listItem)
//!                                    ..
//!                                  Exit(listItem)
//!                                Exit(listUnordered)
//! ```
//!
//! An item ends before the line endings (and container prefixes) that
//! trail its content. The first trailing line ending stays a plain
//! `lineEnding`; any further ones are blank lines between items and make the
//! whole list spread. An item is spread on its own when a blank line occurs
//! inside its content.
//!
//! So `- a\n\n- b` gives a spread list of two items that are not spread:
//! the blank line trails `a` rather than sitting inside it. See
//! `blank_line_between_items_spreads_the_list_only` and
//! `blank_line_at_the_item_boundary_is_not_inside_the_item`.

use crate::error::{CompileError, Result};
use crate::token::{Event, Token, TokenType};

/// Wrap the items of every list in `events` in `listItem` tokens.
///
/// Each list is collected into its own buffer; when it closes, it is
/// prepared and appended to the buffer of whatever contains it, so inner
/// lists are always prepared before the lists around them.
pub fn prepare_lists(events: Vec<Event>) -> Result<Vec<Event>> {
    let mut buffers: Vec<Vec<Event>> = vec![Vec::with_capacity(events.len())];

    for event in events {
        if !event.token.kind.is_list() {
            current(&mut buffers)?.push(event);
            continue;
        }

        if event.is_enter() {
            buffers.push(vec![event]);
            continue;
        }

        if buffers.len() < 2 {
            return Err(CompileError::invariant(format!(
                "`{}` exited at {} while no list is open",
                event.token.kind, event.token.start
            )));
        }
        let mut list = buffers
            .pop()
            .ok_or_else(|| CompileError::invariant("expected list to be open"))?;
        list.push(event);

        let prepared = prepare_list(list);
        current(&mut buffers)?.extend(prepared);
    }

    if buffers.len() > 1 {
        let open = buffers
            .last()
            .and_then(|list| list.first())
            .map(|event| format!("`{}` at {}", event.token.kind, event.token.start))
            .unwrap_or_default();
        return Err(CompileError::invariant(format!(
            "list {open} is never exited"
        )));
    }

    buffers
        .pop()
        .ok_or_else(|| CompileError::invariant("expected event buffer"))
}

fn current(buffers: &mut [Vec<Event>]) -> Result<&mut Vec<Event>> {
    buffers
        .last_mut()
        .ok_or_else(|| CompileError::invariant("expected event buffer"))
}

/// Wrap the items of one list, `enter(list)` first and `exit(list)` last,
/// whose inner lists were already prepared.
fn prepare_list(events: Vec<Event>) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::with_capacity(events.len() + events.len() / 4);
    // Open containers below the list: blockquotes and nested lists. The list
    // itself brings it to 0; its exit to -1.
    let mut container_balance: i32 = -1;
    let mut at_marker = false;
    let mut first_blank_line: Option<usize> = None;
    let mut item: Option<usize> = None;
    let mut list_spread = false;
    let mut items = 0;

    for event in events {
        let index = out.len();
        let kind = &event.token.kind;

        match kind {
            TokenType::BlockQuote | TokenType::ListOrdered | TokenType::ListUnordered => {
                container_balance += if event.is_enter() { 1 } else { -1 };
                at_marker = false;
            }
            TokenType::LineEndingBlank => {
                if event.is_enter() {
                    if item.is_some()
                        && !at_marker
                        && container_balance == 0
                        && first_blank_line.is_none()
                    {
                        first_blank_line = Some(index);
                    }
                    at_marker = false;
                }
            }
            TokenType::LinePrefix
            | TokenType::ListItemMarker
            | TokenType::ListItemPrefix
            | TokenType::ListItemPrefixWhitespace
            | TokenType::ListItemValue => {}
            _ => at_marker = false,
        }

        let item_start = container_balance == 0
            && event.is_enter()
            && *kind == TokenType::ListItemPrefix;
        let list_end = container_balance == -1 && event.is_exit() && kind.is_list();

        if item_start || list_end {
            if let Some(item_index) = item {
                let line_index = trailing_line_ending(&mut out, &mut list_spread);

                let spread = match (first_blank_line, line_index) {
                    (Some(blank), Some(line)) => blank < line,
                    (Some(_), None) => true,
                    (None, _) => false,
                };

                let end = match line_index {
                    Some(line) => out[line].token.start,
                    None => event.token.end,
                };

                let open = &mut out[item_index].token;
                open.spread = spread;
                open.end = end;
                let exit = Event::exit(open.clone());
                out.insert(line_index.unwrap_or(out.len()), exit);
            }

            if item_start {
                let start = event.token.start;
                out.push(Event::enter(Token {
                    kind: TokenType::ListItem,
                    start,
                    end: start,
                    spread: false,
                }));
                item = Some(out.len() - 1);
                items += 1;
                first_blank_line = None;
                at_marker = true;
            }
        }

        out.push(event);
    }

    if let Some(first) = out.first_mut() {
        first.token.spread = list_spread;
    }
    if let Some(last) = out.last_mut() {
        last.token.spread = list_spread;
    }

    log::trace!(
        "prepared list with {items} item(s), {} event(s), spread: {list_spread}",
        out.len()
    );
    out
}

/// Walk back over the line endings and container prefixes that trail the
/// current item, and return the index of the earliest line ending.
///
/// That one becomes a `lineEnding`; every later one becomes a
/// `lineEndingBlank` and marks the list as spread.
fn trailing_line_ending(out: &mut [Event], list_spread: &mut bool) -> Option<usize> {
    let mut line_index: Option<usize> = None;

    for tail in (0..out.len()).rev() {
        let event = &out[tail];
        if event.token.kind.is_line_ending() {
            if event.is_exit() {
                continue;
            }
            if let Some(later) = line_index {
                retype(out, later, TokenType::LineEndingBlank);
                *list_spread = true;
            }
            retype(out, tail, TokenType::LineEnding);
            line_index = Some(tail);
        } else if !matches!(
            event.token.kind,
            TokenType::BlockQuoteMarker
                | TokenType::BlockQuotePrefix
                | TokenType::BlockQuotePrefixWhitespace
                | TokenType::LinePrefix
                | TokenType::ListItemIndent
        ) {
            break;
        }
    }

    line_index
}

/// Change the type of the line ending entered at `index`, and of its exit.
fn retype(out: &mut [Event], index: usize, kind: TokenType) {
    if let Some(exit) = out
        .get_mut(index + 1)
        .filter(|event| event.is_exit() && event.token.kind.is_line_ending())
    {
        exit.token.kind = kind.clone();
    }
    out[index].token.kind = kind;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBuilder;
    use pretty_assertions::assert_eq;

    fn outline(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter(|event| {
                matches!(
                    event.token.kind,
                    TokenType::ListItem
                        | TokenType::ListOrdered
                        | TokenType::ListUnordered
                        | TokenType::LineEnding
                        | TokenType::LineEndingBlank
                ) && (event.is_enter() || !event.token.kind.is_line_ending())
            })
            .map(|event| {
                format!(
                    "{} {}{}",
                    if event.is_enter() { "enter" } else { "exit" },
                    event.token.kind,
                    if event.token.spread { " spread" } else { "" }
                )
            })
            .collect()
    }

    fn item(builder: EventBuilder<'_>, prefix: usize, text: usize) -> EventBuilder<'_> {
        builder
            .enter("listItemPrefix", prefix..prefix + 2)
            .leaf("listItemMarker", prefix..prefix + 1)
            .leaf("listItemPrefixWhitespace", prefix + 1..prefix + 2)
            .exit()
            .enter("paragraph", text..text + 1)
            .leaf("data", text..text + 1)
            .exit()
    }

    #[test]
    fn tight_list() {
        let source = "- a\n- b";
        let builder = EventBuilder::new(source).enter("listUnordered", 0..7);
        let builder = item(builder, 0, 2).leaf("lineEnding", 3..4);
        let events = item(builder, 4, 6).exit().build().unwrap();

        let prepared = prepare_lists(events).unwrap();
        assert_eq!(
            outline(&prepared),
            [
                "enter listUnordered",
                "enter listItem",
                "exit listItem",
                "enter lineEnding",
                "enter listItem",
                "exit listItem",
                "exit listUnordered",
            ]
        );

        let first_exit = prepared
            .iter()
            .find(|event| event.is_exit() && event.token.kind == TokenType::ListItem)
            .unwrap();
        assert_eq!(first_exit.token.end.offset, 3);
        assert_eq!(prepared[1].token.start.offset, 0);
        assert_eq!(prepared.last().unwrap().token.end.offset, 7);
    }

    #[test]
    fn blank_line_between_items_spreads_the_list_only() {
        let source = "- a\n\n- b";
        let builder = EventBuilder::new(source).enter("listUnordered", 0..8);
        let builder = item(builder, 0, 2)
            .leaf("lineEnding", 3..4)
            .leaf("lineEndingBlank", 4..5);
        let events = item(builder, 5, 7).exit().build().unwrap();

        let prepared = prepare_lists(events).unwrap();
        assert_eq!(
            outline(&prepared),
            [
                "enter listUnordered spread",
                "enter listItem",
                "exit listItem",
                "enter lineEnding",
                "enter lineEndingBlank",
                "enter listItem",
                "exit listItem",
                "exit listUnordered spread",
            ]
        );
    }

    #[test]
    fn blank_line_inside_item_spreads_the_item() {
        let source = "- a\n\n  b";
        let events = item(EventBuilder::new(source).enter("listUnordered", 0..8), 0, 2)
            .leaf("lineEnding", 3..4)
            .leaf("lineEndingBlank", 4..5)
            .leaf("linePrefix", 5..7)
            .enter("paragraph", 7..8)
            .leaf("data", 7..8)
            .exit()
            .exit()
            .build()
            .unwrap();

        let prepared = prepare_lists(events).unwrap();
        assert_eq!(
            outline(&prepared),
            [
                "enter listUnordered",
                "enter listItem spread",
                "enter lineEnding",
                "enter lineEndingBlank",
                "exit listItem spread",
                "exit listUnordered",
            ]
        );
    }

    #[test]
    fn blank_line_at_the_item_boundary_is_not_inside_the_item() {
        // The only trailing line ending is the recorded blank line itself.
        let source = "- a\n- b";
        let builder = EventBuilder::new(source).enter("listUnordered", 0..7);
        let builder = item(builder, 0, 2).leaf("lineEndingBlank", 3..4);
        let events = item(builder, 4, 6).exit().build().unwrap();

        let prepared = prepare_lists(events).unwrap();
        assert_eq!(
            outline(&prepared),
            [
                "enter listUnordered",
                "enter listItem",
                "exit listItem",
                "enter lineEnding",
                "enter listItem",
                "exit listItem",
                "exit listUnordered",
            ]
        );
        let line_exit = prepared
            .iter()
            .find(|event| event.is_exit() && event.token.kind.is_line_ending())
            .unwrap();
        assert_eq!(line_exit.token.kind, TokenType::LineEnding);
    }

    #[test]
    fn blank_lines_in_nested_containers_do_not_count() {
        // - a
        //   - b
        //
        //   - c
        let source = "- a\n  - b\n\n  - c";
        let builder = item(EventBuilder::new(source).enter("listUnordered", 0..16), 0, 2)
            .leaf("lineEnding", 3..4)
            .leaf("linePrefix", 4..6)
            .enter("listUnordered", 6..16);
        let builder = item(builder, 6, 8)
            .leaf("lineEnding", 9..10)
            .leaf("lineEndingBlank", 10..11)
            .leaf("linePrefix", 11..13);
        let events = item(builder, 13, 15).exit().exit().build().unwrap();

        let prepared = prepare_lists(events).unwrap();
        assert_eq!(
            outline(&prepared),
            [
                "enter listUnordered",
                "enter listItem",
                "enter lineEnding",
                "enter listUnordered spread",
                "enter listItem",
                "exit listItem",
                "enter lineEnding",
                "enter lineEndingBlank",
                "enter listItem",
                "exit listItem",
                "exit listUnordered spread",
                "exit listItem",
                "exit listUnordered",
            ]
        );
    }

    #[test]
    fn events_outside_lists_pass_through() {
        let events = EventBuilder::new("a")
            .enter("paragraph", 0..1)
            .leaf("data", 0..1)
            .exit()
            .build()
            .unwrap();
        assert_eq!(prepare_lists(events.clone()).unwrap(), events);
    }

    #[test]
    fn unbalanced_lists_are_rejected() {
        let mut unopened = EventBuilder::new("- a")
            .leaf("listItemMarker", 0..1)
            .build()
            .unwrap();
        unopened.push(Event::exit(Token::new(
            TokenType::ListUnordered,
            Default::default(),
            Default::default(),
        )));
        assert!(matches!(
            prepare_lists(unopened),
            Err(CompileError::Invariant(_))
        ));

        let unclosed = EventBuilder::new("- a")
            .enter("listUnordered", 0..3)
            .build_unchecked();
        assert!(matches!(
            prepare_lists(unclosed),
            Err(CompileError::Invariant(_))
        ));
    }
}
