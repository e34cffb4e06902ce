//! Fenced, indented and inline code.

use super::expected;
use crate::context::CompileContext;
use crate::error::Result;
use crate::token::Token;
use crate::tree::{Code, Node};

fn code_mut<'c>(context: &'c mut CompileContext<'_>) -> Result<&'c mut Code> {
    match context.top_node_mut()? {
        Node::Code(code) => Ok(code),
        other => Err(expected("code", other.type_name())),
    }
}

/// Drop one line ending from each end of a code body.
fn trim_line_endings(value: &str) -> &str {
    let value = value
        .strip_prefix("\r\n")
        .or_else(|| value.strip_prefix(['\n', '\r']))
        .unwrap_or(value);
    value
        .strip_suffix("\r\n")
        .or_else(|| value.strip_suffix(['\n', '\r']))
        .unwrap_or(value)
}

/// The opening fence is done: everything up to the closing fence is the body.
pub(super) fn exit_code_fenced_fence(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    if !context.data.flow_code_inside {
        context.buffer();
        context.data.flow_code_inside = true;
    }
    Ok(())
}

pub(super) fn exit_code_fenced_fence_info(
    context: &mut CompileContext<'_>,
    _: &Token,
) -> Result<()> {
    let lang = context.resume()?;
    code_mut(context)?.lang = Some(lang);
    Ok(())
}

pub(super) fn exit_code_fenced_fence_meta(
    context: &mut CompileContext<'_>,
    _: &Token,
) -> Result<()> {
    let meta = context.resume()?;
    code_mut(context)?.meta = Some(meta);
    Ok(())
}

pub(super) fn exit_code_fenced(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    let value = context.resume()?;
    code_mut(context)?.value = trim_line_endings(&value).to_string();
    context.data.flow_code_inside = false;
    Ok(())
}

pub(super) fn exit_code_indented(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    let value = context.resume()?;
    code_mut(context)?.value = trim_line_endings(&value).to_string();
    Ok(())
}

pub(super) fn exit_code_text(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    let value = context.resume()?;
    match context.top_node_mut()? {
        Node::InlineCode(code) => code.value = value,
        other => return Err(expected("inline code", other.type_name())),
    }
    Ok(())
}
