//! Links, images, references, definitions and autolinks.
//!
//! A link or image is opened as a [`Pending`] entry: whether it ends up as a
//! resource (`[a](b)`) or a reference (`[a]`, `[a][]`, `[a][b]`) is only
//! known once its label is followed, or not, by a resource. Label facts are
//! stashed on the entry in the meantime and the closing handler picks the
//! variant.

use super::expected;
use super::literal::exit_data;
use crate::context::CompileContext;
use crate::decode::{decode_string, normalize_identifier};
use crate::error::Result;
use crate::stack::{Pending, PendingKind};
use crate::token::Token;
use crate::tree::{Definition, Node, ReferenceType};

pub(super) fn enter_link(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    context.enter_pending(Pending::link(), token)
}

pub(super) fn enter_image(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    context.enter_pending(Pending::image(), token)
}

/// Move the buffered label onto the link (as children) or image (as alt).
pub(super) fn exit_label(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    let fragment = context.resume_fragment()?;
    // Assume a reference until a resource says otherwise.
    context.data.in_reference = true;

    let pending = context.pending_mut(0)?;
    match pending.kind {
        PendingKind::Link => pending.children = fragment.children,
        PendingKind::Image => pending.alt = Some(fragment.text_content()),
    }
    Ok(())
}

/// Stash the label in case this turns out to be a reference.
pub(super) fn exit_label_text(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    let label = context.slice_serialize(token)?;
    // The label fragment is on top, the link or image below it.
    let pending = context.pending_mut(1)?;
    pending.label = Some(decode_string(label));
    pending.identifier = Some(normalize_identifier(label));
    Ok(())
}

pub(super) fn enter_reference(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.data.reference_type = Some(ReferenceType::Collapsed);
    Ok(())
}

pub(super) fn exit_reference_string(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    let label = context.resume()?;
    let string = context.slice_serialize(token)?;

    let pending = context.pending_mut(0)?;
    pending.label = Some(label);
    pending.identifier = Some(normalize_identifier(string));
    context.data.reference_type = Some(ReferenceType::Full);
    Ok(())
}

pub(super) fn exit_resource(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.data.in_reference = false;
    Ok(())
}

pub(super) fn exit_resource_destination_string(
    context: &mut CompileContext<'_>,
    _: &Token,
) -> Result<()> {
    let url = context.resume()?;
    context.pending_mut(0)?.url = url;
    Ok(())
}

pub(super) fn exit_resource_title_string(
    context: &mut CompileContext<'_>,
    _: &Token,
) -> Result<()> {
    let title = context.resume()?;
    context.pending_mut(0)?.title = Some(title);
    Ok(())
}

/// Decide between resource and reference before the entry is exited.
pub(super) fn exit_link_or_image(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    let reference_type = context
        .data
        .in_reference
        .then(|| context.data.reference_type.unwrap_or(ReferenceType::Shortcut));

    context.pending_mut(0)?.reference_type = reference_type;
    context.data.reference_type = None;
    Ok(())
}

fn definition_mut<'c>(context: &'c mut CompileContext<'_>) -> Result<&'c mut Definition> {
    match context.top_node_mut()? {
        Node::Definition(definition) => Ok(definition),
        other => Err(expected("definition", other.type_name())),
    }
}

pub(super) fn exit_definition_label_string(
    context: &mut CompileContext<'_>,
    token: &Token,
) -> Result<()> {
    let label = context.resume()?;
    let string = context.slice_serialize(token)?;

    let definition = definition_mut(context)?;
    definition.label = Some(label);
    definition.identifier = normalize_identifier(string);
    Ok(())
}

pub(super) fn exit_definition_destination_string(
    context: &mut CompileContext<'_>,
    _: &Token,
) -> Result<()> {
    let url = context.resume()?;
    definition_mut(context)?.url = url;
    Ok(())
}

pub(super) fn exit_definition_title_string(
    context: &mut CompileContext<'_>,
    _: &Token,
) -> Result<()> {
    let title = context.resume()?;
    definition_mut(context)?.title = Some(title);
    Ok(())
}

fn set_autolink_url(context: &mut CompileContext<'_>, url: String) -> Result<()> {
    match context.top_node_mut()? {
        Node::Link(link) => link.url = url,
        other => return Err(expected("link", other.type_name())),
    }
    Ok(())
}

pub(super) fn exit_autolink_protocol(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    exit_data(context, token)?;
    let url = context.slice_serialize(token)?.to_string();
    set_autolink_url(context, url)
}

pub(super) fn exit_autolink_email(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    exit_data(context, token)?;
    let url = format!("mailto:{}", context.slice_serialize(token)?);
    set_autolink_url(context, url)
}
