use super::expected;
use crate::context::CompileContext;
use crate::error::{CompileError, Result};
use crate::token::Token;
use crate::tree::{Heading, Node};

fn heading_mut<'c>(context: &'c mut CompileContext<'_>) -> Result<&'c mut Heading> {
    match context.top_node_mut()? {
        Node::Heading(heading) => Ok(heading),
        other => Err(expected("heading", other.type_name())),
    }
}

/// The opening `#` run sets the depth; a closing run is ignored.
pub(super) fn exit_atx_heading_sequence(
    context: &mut CompileContext<'_>,
    token: &Token,
) -> Result<()> {
    let sequence = context.slice_serialize(token)?;
    let heading = heading_mut(context)?;
    if heading.depth != 0 {
        return Ok(());
    }

    let depth = sequence.chars().count();
    heading.depth = match u8::try_from(depth) {
        Ok(depth @ 1..=6) => depth,
        _ => {
            return Err(CompileError::invariant(format!(
                "expected `depth` between `1` and `6`, found `{depth}`"
            )));
        }
    };
    Ok(())
}

pub(super) fn exit_setext_heading_text(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.data.setext_heading_slurp_line_ending = true;
    Ok(())
}

pub(super) fn exit_setext_heading_line_sequence(
    context: &mut CompileContext<'_>,
    token: &Token,
) -> Result<()> {
    let underline = context.slice_serialize(token)?;
    heading_mut(context)?.depth = if underline.starts_with('=') { 1 } else { 2 };
    Ok(())
}

pub(super) fn exit_setext_heading(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.data.setext_heading_slurp_line_ending = false;
    Ok(())
}
