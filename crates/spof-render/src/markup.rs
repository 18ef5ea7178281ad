//! Markup rendering: one element per block and field.
//!
//! ```text
//! <chatbot_prompt>
//!   <role>You are Alex, ...</role>
//!   <personality>
//!     <name>Alex</name>
//!     <traits>
//!       <item>Friendly and approachable</item>
//!     </traits>
//!   </personality>
//! </chatbot_prompt>
//! ```
//!
//! List members are always `<item>` elements; a block inside a list is
//! wrapped in one, so list containers stay distinguishable from blocks.
//! Empty lists and empty blocks are self-closing. Only element text is
//! written, so `&`, `<` and `>` are the characters that get escaped.

use quick_xml::escape::partial_escape;
use spof_core::{Block, FieldValue, LIST_ITEM};

use crate::{check_list_element, RenderError, RenderOptions};

pub fn render(block: &Block, options: &RenderOptions) -> Result<String, RenderError> {
    let mut out = String::new();
    write_block(&mut out, block, 0, block.name(), options)?;
    Ok(out)
}

fn write_block(
    out: &mut String,
    block: &Block,
    depth: usize,
    path: &str,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let pad = options.pad(depth);
    if block.present_fields().next().is_none() {
        out.push_str(&format!("{}<{}/>\n", pad, block.name()));
        return Ok(());
    }

    out.push_str(&format!("{}<{}>\n", pad, block.name()));
    for field in block.present_fields() {
        let label = field.label();
        let field_path = format!("{}.{}", path, label);
        write_field(out, label, &field.value, depth + 1, &field_path, options)?;
    }
    out.push_str(&format!("{}</{}>\n", pad, block.name()));
    Ok(())
}

fn write_field(
    out: &mut String,
    label: &str,
    value: &FieldValue,
    depth: usize,
    path: &str,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let pad = options.pad(depth);
    match value {
        FieldValue::Scalar(s) => write_leaf(out, &pad, label, &s.to_string()),
        FieldValue::Text(t) => write_leaf(out, &pad, label, &t.content),
        FieldValue::Block(b) | FieldValue::OptionalBlock(Some(b)) => {
            write_block(out, b, depth, path, options)?
        }
        FieldValue::OptionalBlock(None) => {}
        FieldValue::List(values) => {
            if values.is_empty() {
                out.push_str(&format!("{}<{}/>\n", pad, label));
            } else {
                out.push_str(&format!("{}<{}>\n", pad, label));
                for (i, v) in values.iter().enumerate() {
                    write_item(out, v, depth + 1, &format!("{}[{}]", path, i), options)?;
                }
                out.push_str(&format!("{}</{}>\n", pad, label));
            }
        }
        FieldValue::Items(items) => {
            if items.items.is_empty() {
                out.push_str(&format!("{}<{}/>\n", pad, label));
            } else {
                out.push_str(&format!("{}<{}>\n", pad, label));
                let inner = options.pad(depth + 1);
                for item in &items.items {
                    write_leaf(out, &inner, LIST_ITEM, item);
                }
                out.push_str(&format!("{}</{}>\n", pad, label));
            }
        }
    }
    Ok(())
}

fn write_item(
    out: &mut String,
    value: &FieldValue,
    depth: usize,
    path: &str,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    check_list_element(value, path)?;
    let pad = options.pad(depth);
    match value {
        FieldValue::Scalar(s) => write_leaf(out, &pad, LIST_ITEM, &s.to_string()),
        FieldValue::Block(b) => {
            out.push_str(&format!("{}<{}>\n", pad, LIST_ITEM));
            write_block(out, b, depth + 1, path, options)?;
            out.push_str(&format!("{}</{}>\n", pad, LIST_ITEM));
        }
        // nested lists reuse the field layout under an item label
        other => write_field(out, LIST_ITEM, other, depth, path, options)?,
    }
    Ok(())
}

fn write_leaf(out: &mut String, pad: &str, label: &str, text: &str) {
    out.push_str(&format!("{}<{}>{}</{}>\n", pad, label, partial_escape(text), label));
}
