use super::expected;
use crate::context::CompileContext;
use crate::error::{CompileError, Result};
use crate::token::Token;
use crate::tree::Node;

pub(super) fn enter_list_ordered(context: &mut CompileContext<'_>, _: &Token) -> Result<()> {
    context.data.expecting_first_list_item_value = true;
    Ok(())
}

/// The first item's number is the start of an ordered list.
pub(super) fn enter_list_item_value(context: &mut CompileContext<'_>, token: &Token) -> Result<()> {
    if !context.data.expecting_first_list_item_value {
        return Ok(());
    }

    let value = context.slice_serialize(token)?;
    let start = value.parse::<u32>().map_err(|error| {
        CompileError::invariant(format!("malformed list item value `{value}`: {error}"))
    })?;

    // The item this value belongs to is on top; its list is right below.
    let ancestor = context.ancestor_mut(1)?;
    let found = ancestor.type_name().to_string();
    match ancestor.as_node_mut() {
        Some(Node::List(list)) => list.start = Some(start),
        _ => return Err(expected("list", &found)),
    }
    context.data.expecting_first_list_item_value = false;
    Ok(())
}
