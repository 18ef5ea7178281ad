//! Section rendering: a Markdown document with one heading per block.
//!
//! Heading depth follows nesting (root is `#`). Scalars become
//! `**label**: value` lines, plain lists a labelled bullet list, and
//! `Text` / `Items` wrappers a sub-heading of their own. A list of blocks
//! is a sub-section with one heading per block beneath it. Plain fields
//! that follow a sub-section are given their own heading, so Markdown
//! keeps them in the parent's scope.
use spof_core::{Block, FieldValue};

use crate::{check_list_element, RenderError, RenderOptions};

pub fn render(block: &Block, options: &RenderOptions) -> Result<String, RenderError> {
    let mut out = String::new();
    write_block(&mut out, block, 1, block.name(), options)?;
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    Ok(out)
}

fn heading(out: &mut String, level: usize, title: &str, options: &RenderOptions) {
    let level = level.clamp(1, options.max_heading_depth.max(1));
    out.push_str(&"#".repeat(level));
    out.push(' ');
    out.push_str(title);
    out.push_str("\n\n");
}

fn write_block(
    out: &mut String,
    block: &Block,
    level: usize,
    path: &str,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    heading(out, level, block.name(), options);
    let mut sectioned = false;
    for field in block.present_fields() {
        let label = field.label();
        let field_path = format!("{}.{}", path, label);
        sectioned = write_field(out, label, &field.value, level, &field_path, sectioned, options)?;
    }
    Ok(())
}

/// Writes one field of a block whose heading sits at `level`.
///
/// Once a field has opened a sub-section, later plain fields get a
/// sub-heading of their own so they do not read as part of it. Returns
/// whether the block now has a sub-section open.
fn write_field(
    out: &mut String,
    label: &str,
    value: &FieldValue,
    level: usize,
    path: &str,
    sectioned: bool,
    options: &RenderOptions,
) -> Result<bool, RenderError> {
    match value {
        FieldValue::Scalar(s) if sectioned => {
            heading(out, level + 1, label, options);
            out.push_str(&format!("{}\n\n", s));
        }
        FieldValue::Scalar(s) => out.push_str(&format!("**{}**: {}\n\n", label, s)),
        FieldValue::Block(b) | FieldValue::OptionalBlock(Some(b)) => {
            write_block(out, b, level + 1, path, options)?;
            return Ok(true);
        }
        FieldValue::OptionalBlock(None) => {}
        FieldValue::Text(t) => {
            heading(out, level + 1, label, options);
            out.push_str(t.content.trim_end());
            out.push_str("\n\n");
            return Ok(true);
        }
        FieldValue::Items(items) => {
            heading(out, level + 1, label, options);
            for item in &items.items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push('\n');
            return Ok(true);
        }
        FieldValue::List(values) if values.iter().any(|v| matches!(v, FieldValue::Block(_))) => {
            // the list gets its own heading; its blocks nest one level below
            heading(out, level + 1, label, options);
            let mut in_bullets = false;
            for (i, v) in values.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                check_list_element(v, &item_path)?;
                match v {
                    FieldValue::Block(b) => {
                        if in_bullets {
                            out.push('\n');
                            in_bullets = false;
                        }
                        write_block(out, b, level + 2, &item_path, options)?;
                    }
                    other => {
                        write_bullet(out, other, 0, &item_path)?;
                        in_bullets = true;
                    }
                }
            }
            if in_bullets {
                out.push('\n');
            }
            return Ok(true);
        }
        FieldValue::List(values) => {
            if sectioned {
                heading(out, level + 1, label, options);
            } else {
                out.push_str(&format!("**{}**:\n\n", label));
            }
            for (i, v) in values.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                check_list_element(v, &item_path)?;
                write_bullet(out, v, 0, &item_path)?;
            }
            if !values.is_empty() {
                out.push('\n');
            }
        }
    }
    Ok(sectioned)
}

fn write_bullet(
    out: &mut String,
    value: &FieldValue,
    indent: usize,
    path: &str,
) -> Result<(), RenderError> {
    let pad = "  ".repeat(indent);
    match value {
        FieldValue::Scalar(s) => out.push_str(&format!("{}- {}\n", pad, s)),
        FieldValue::List(values) => {
            out.push_str(&format!("{}-\n", pad));
            for (i, v) in values.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                check_list_element(v, &item_path)?;
                write_bullet(out, v, indent + 1, &item_path)?;
            }
        }
        FieldValue::Block(b) => out.push_str(&format!("{}- {}\n", pad, b.name())),
        other => {
            return Err(RenderError::UnsupportedField {
                path: path.to_string(),
                kind: other.kind_name(),
            })
        }
    }
    Ok(())
}
