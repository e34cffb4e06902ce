use std::fmt::Write;

use markdown_mdast_compiler::tree::{Node, Root};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Render a tree one node per line, with positions and the fields that
/// distinguish nodes of the same type.
pub fn format_tree(root: &Root) -> String {
    let mut out = format!("root {}\n", root.position);
    for child in &root.children {
        write_node(child, 1, &mut out);
    }
    out
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    let prefix = "  ".repeat(depth);
    let _ = write!(out, "{prefix}{} {}", node.type_name(), node.position());

    match node {
        Node::Heading(heading) => {
            let _ = write!(out, " depth={}", heading.depth);
        }
        Node::Code(code) => {
            if let Some(lang) = &code.lang {
                let _ = write!(out, " lang={lang:?}");
            }
            if let Some(meta) = &code.meta {
                let _ = write!(out, " meta={meta:?}");
            }
        }
        Node::List(list) => {
            let _ = write!(out, " ordered={}", list.ordered);
            if let Some(start) = list.start {
                let _ = write!(out, " start={start}");
            }
            let _ = write!(out, " spread={}", list.spread);
        }
        Node::ListItem(item) => {
            let _ = write!(out, " spread={}", item.spread);
        }
        Node::Link(link) => {
            let _ = write!(out, " url={:?}", link.url);
            if let Some(title) = &link.title {
                let _ = write!(out, " title={title:?}");
            }
        }
        Node::Image(image) => {
            let _ = write!(out, " url={:?}", image.url);
            if let Some(alt) = &image.alt {
                let _ = write!(out, " alt={alt:?}");
            }
        }
        Node::LinkReference(reference) => {
            let _ = write!(
                out,
                " {} identifier={:?}",
                reference.reference_type, reference.identifier
            );
        }
        Node::ImageReference(reference) => {
            let _ = write!(
                out,
                " {} identifier={:?}",
                reference.reference_type, reference.identifier
            );
        }
        Node::Definition(definition) => {
            let _ = write!(
                out,
                " identifier={:?} url={:?}",
                definition.identifier, definition.url
            );
            if let Some(title) = &definition.title {
                let _ = write!(out, " title={title:?}");
            }
        }
        _ => {}
    }

    if let Some(value) = node.value() {
        let _ = write!(out, " {value:?}");
    }
    out.push('\n');

    for child in node.children().into_iter().flatten() {
        write_node(child, depth + 1, out);
    }
}
