//! Text, line endings, breaks, raw HTML and character references.

use super::expected;
use crate::context::{CharacterReferenceType, CompileContext};
use crate::decode::{decode_named, decode_numeric};
use crate::error::{CompileError, Result};
use crate::point::Position;
use crate::token::{Token, TokenType};
use crate::tree::{Node, Text};

/// Open a text node, or reopen the current parent's last child if it is
/// text already.
pub(super) fn enter_data(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    let start = context.point(&token.start);
    let children = context.children_mut()?;

    let text = match children.pop() {
        Some(Node::Text(text)) => text,
        tail => {
            children.extend(tail);
            Text {
                value: String::new(),
                position: Position::at(start),
            }
        }
    };

    context.push(Node::Text(text));
    Ok(())
}

/// Append the token's source to the open literal and close it.
pub(super) fn exit_data(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    let value = context.slice_serialize(token)?;
    let end = context.point(&token.end);
    let mut entry = context.pop()?;

    match entry.as_node_mut().and_then(Node::value_mut) {
        Some(literal) => literal.push_str(value),
        None => return Err(expected("literal", entry.type_name())),
    }
    if let Some(position) = entry.position_mut() {
        position.end = end;
    }

    context.attach(entry)
}

pub(super) fn exit_line_ending(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    if context.data.at_hard_break {
        let end = context.point(&token.end);
        let tail = context
            .children_mut()?
            .last_mut()
            .ok_or_else(|| CompileError::invariant("expected break before line ending"))?;
        tail.position_mut().end = end;
        context.data.at_hard_break = false;
        return Ok(());
    }

    let parent = context.top()?.type_name();
    if !context.data.setext_heading_slurp_line_ending && context.config().can_contain_eols(parent)
    {
        enter_data(context, token)?;
        exit_data(context, token)?;
    }
    Ok(())
}

pub(super) fn exit_hard_break(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.data.at_hard_break = true;
    Ok(())
}

pub(super) fn exit_html(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    let value = context.resume()?;
    match context.top_node_mut()? {
        Node::Html(html) => html.value = value,
        other => return Err(expected("html", other.type_name())),
    }
    Ok(())
}

pub(super) fn exit_character_reference_marker(
    context: &mut CompileContext<'_>,
    token: &Token,
) -> Result<()> {
    context.data.character_reference_type = match token.kind {
        TokenType::CharacterReferenceMarkerHexadecimal => Some(CharacterReferenceType::Hexadecimal),
        _ => Some(CharacterReferenceType::Decimal),
    };
    Ok(())
}

pub(super) fn exit_character_reference_value(
    context: &mut CompileContext<'_>,
    token: &Token,
) -> Result<()> {
    let reference = context.slice_serialize(token)?;

    let value = match context.data.character_reference_type.take() {
        Some(kind) => {
            let radix = match kind {
                CharacterReferenceType::Decimal => 10,
                CharacterReferenceType::Hexadecimal => 16,
            };
            decode_numeric(reference, radix)
                .ok_or_else(|| CompileError::Decode {
                    reference: reference.to_string(),
                })?
                .to_string()
        }
        None => decode_named(reference).ok_or_else(|| CompileError::Decode {
            reference: reference.to_string(),
        })?,
    };

    let top = context.top_node_mut()?;
    let found = top.type_name().to_string();
    top.value_mut()
        .ok_or_else(|| expected("literal", &found))?
        .push_str(&value);
    Ok(())
}

/// Close the text node the reference was decoded into.
pub(super) fn exit_character_reference(
    context: &mut CompileContext<'_>,
    token: &Token,
) -> Result<()> {
    let end = context.point(&token.end);
    let mut entry = context.pop()?;
    if let Some(position) = entry.position_mut() {
        position.end = end;
    }
    context.attach(entry)
}
