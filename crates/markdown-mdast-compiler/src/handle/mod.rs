//! The CommonMark handler table.
//!
//! Most node-producing tokens follow one of two shapes, built here from
//! small pieces:
//!
//! - [`opener`]: enter a freshly created node, then optionally run a follow
//!   up (e.g. start buffering the node's value).
//! - [`closer`]: optionally run a finalizer against the node still on top of
//!   the stack, then exit it.
//!
//! Everything else is a plain handler living next to the nodes it concerns:
//! [`literal`] for text-like content, [`code`], [`heading`], [`list`], and
//! [`link`] for links, images, references and definitions.

mod code;
mod heading;
mod link;
mod list;
mod literal;

use std::collections::HashMap;

use crate::config::{Config, Handle, handle};
use crate::context::CompileContext;
use crate::error::{CompileError, Result};
use crate::token::{Token, TokenType};
use crate::tree::{
    Blockquote, Break, Code, Definition, Emphasis, Heading, Html, InlineCode, Link, List,
    ListItem, Node, Paragraph, Strong, ThematicBreak,
};

type HandleFn = fn(&mut CompileContext<'_>, &Token) -> Result<()>;
type Create = fn(&Token) -> Node;

/// Node types whose direct line endings become text.
pub(crate) const CAN_CONTAIN_EOLS: [&str; 5] =
    ["emphasis", "fragment", "heading", "paragraph", "strong"];

fn opener(create: Create) -> Handle {
    handle(move |context, token| context.enter(create(token), token, None))
}

fn opener_then(create: Create, and: HandleFn) -> Handle {
    handle(move |context, token| {
        context.enter(create(token), token, None)?;
        and(context, token)
    })
}

fn closer() -> Handle {
    handle(|context, token| context.exit(token, None))
}

fn closer_after(and: HandleFn) -> Handle {
    handle(move |context, token| {
        and(context, token)?;
        context.exit(token, None)
    })
}

fn buffer(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.buffer();
    Ok(())
}

pub(crate) fn expected(what: &str, found: &str) -> CompileError {
    CompileError::invariant(format!("expected {what} on stack, found `{found}`"))
}

pub(crate) fn commonmark() -> Config {
    use TokenType as T;

    let enter = HashMap::from([
        (T::AtxHeading, opener(|_| Heading::default().into())),
        (T::Autolink, opener(|_| Link::default().into())),
        (T::AutolinkEmail, handle(literal::enter_data)),
        (T::AutolinkProtocol, handle(literal::enter_data)),
        (T::BlockQuote, opener(|_| Blockquote::default().into())),
        (T::CharacterEscape, handle(literal::enter_data)),
        (T::CharacterReference, handle(literal::enter_data)),
        (T::CodeFenced, opener(|_| Code::default().into())),
        (T::CodeFencedFenceInfo, handle(buffer)),
        (T::CodeFencedFenceMeta, handle(buffer)),
        (T::CodeFlowValue, handle(literal::enter_data)),
        (T::CodeIndented, opener_then(|_| Code::default().into(), buffer)),
        (T::CodeText, opener_then(|_| InlineCode::default().into(), buffer)),
        (T::CodeTextData, handle(literal::enter_data)),
        (T::Data, handle(literal::enter_data)),
        (T::Definition, opener(|_| Definition::default().into())),
        (T::DefinitionDestinationString, handle(buffer)),
        (T::DefinitionLabelString, handle(buffer)),
        (T::DefinitionTitleString, handle(buffer)),
        (T::Emphasis, opener(|_| Emphasis::default().into())),
        (T::HardBreakEscape, opener(|_| Break::default().into())),
        (T::HardBreakTrailing, opener(|_| Break::default().into())),
        (T::HtmlFlow, opener_then(|_| Html::default().into(), buffer)),
        (T::HtmlFlowData, handle(literal::enter_data)),
        (T::HtmlText, opener_then(|_| Html::default().into(), buffer)),
        (T::HtmlTextData, handle(literal::enter_data)),
        (T::Image, handle(link::enter_image)),
        (T::Label, handle(buffer)),
        (T::Link, handle(link::enter_link)),
        (T::ListItem, opener(|token| ListItem::new(token.spread).into())),
        (T::ListItemValue, handle(list::enter_list_item_value)),
        (
            T::ListOrdered,
            opener_then(|token| List::new(true, token.spread).into(), list::enter_list_ordered),
        ),
        (T::ListUnordered, opener(|token| List::new(false, token.spread).into())),
        (T::Paragraph, opener(|_| Paragraph::default().into())),
        (T::Reference, handle(link::enter_reference)),
        (T::ReferenceString, handle(buffer)),
        (T::ResourceDestinationString, handle(buffer)),
        (T::ResourceTitleString, handle(buffer)),
        (T::SetextHeading, opener(|_| Heading::default().into())),
        (T::Strong, opener(|_| Strong::default().into())),
        (T::ThematicBreak, opener(|_| ThematicBreak::default().into())),
    ]);

    let exit = HashMap::from([
        (T::AtxHeading, closer()),
        (T::AtxHeadingSequence, handle(heading::exit_atx_heading_sequence)),
        (T::Autolink, closer()),
        (T::AutolinkEmail, handle(link::exit_autolink_email)),
        (T::AutolinkProtocol, handle(link::exit_autolink_protocol)),
        (T::BlockQuote, closer()),
        (T::CharacterEscapeValue, handle(literal::exit_data)),
        (T::CharacterReference, handle(literal::exit_character_reference)),
        (
            T::CharacterReferenceMarkerHexadecimal,
            handle(literal::exit_character_reference_marker),
        ),
        (
            T::CharacterReferenceMarkerNumeric,
            handle(literal::exit_character_reference_marker),
        ),
        (T::CharacterReferenceValue, handle(literal::exit_character_reference_value)),
        (T::CodeFenced, closer_after(code::exit_code_fenced)),
        (T::CodeFencedFence, handle(code::exit_code_fenced_fence)),
        (T::CodeFencedFenceInfo, handle(code::exit_code_fenced_fence_info)),
        (T::CodeFencedFenceMeta, handle(code::exit_code_fenced_fence_meta)),
        (T::CodeFlowValue, handle(literal::exit_data)),
        (T::CodeIndented, closer_after(code::exit_code_indented)),
        (T::CodeText, closer_after(code::exit_code_text)),
        (T::CodeTextData, handle(literal::exit_data)),
        (T::Data, handle(literal::exit_data)),
        (T::Definition, closer()),
        (T::DefinitionDestinationString, handle(link::exit_definition_destination_string)),
        (T::DefinitionLabelString, handle(link::exit_definition_label_string)),
        (T::DefinitionTitleString, handle(link::exit_definition_title_string)),
        (T::Emphasis, closer()),
        (T::HardBreakEscape, closer_after(literal::exit_hard_break)),
        (T::HardBreakTrailing, closer_after(literal::exit_hard_break)),
        (T::HtmlFlow, closer_after(literal::exit_html)),
        (T::HtmlFlowData, handle(literal::exit_data)),
        (T::HtmlText, closer_after(literal::exit_html)),
        (T::HtmlTextData, handle(literal::exit_data)),
        (T::Image, closer_after(link::exit_link_or_image)),
        (T::Label, handle(link::exit_label)),
        (T::LabelText, handle(link::exit_label_text)),
        (T::LineEnding, handle(literal::exit_line_ending)),
        (T::Link, closer_after(link::exit_link_or_image)),
        (T::ListItem, closer()),
        (T::ListOrdered, closer()),
        (T::ListUnordered, closer()),
        (T::Paragraph, closer()),
        (T::ReferenceString, handle(link::exit_reference_string)),
        (T::Resource, handle(link::exit_resource)),
        (T::ResourceDestinationString, handle(link::exit_resource_destination_string)),
        (T::ResourceTitleString, handle(link::exit_resource_title_string)),
        (T::SetextHeading, closer_after(heading::exit_setext_heading)),
        (
            T::SetextHeadingLineSequence,
            handle(heading::exit_setext_heading_line_sequence),
        ),
        (T::SetextHeadingText, handle(heading::exit_setext_heading_text)),
        (T::Strong, closer()),
        (T::ThematicBreak, closer()),
    ]);

    Config {
        enter,
        exit,
        can_contain_eols: CAN_CONTAIN_EOLS.map(String::from).to_vec(),
        transforms: Vec::new(),
    }
}
