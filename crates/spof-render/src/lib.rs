//! SPOF-RENDER: Instruction Block to Document Renderer
//!
//! Turns a validated [`Block`] tree into one of three self-contained text
//! documents:
//!
//! - **markup**: nested XML-style elements named after blocks and fields
//! - **sections**: a Markdown document with one heading per block
//! - **data**: an insertion-ordered JSON object mirroring the field tree
//!
//! All three keep the declared field order and leave out absent optional
//! blocks entirely. Markup and data output parse back into the same
//! [`FieldTree`].
//!
//! # Example
//!
//! ```
//! use spof_core::{Block, Items, Schema, Text};
//! use spof_render::{render_markup, render_data, parse_markup, parse_data};
//!
//! let schema = Schema::new("prompt").text("intro").items("rules");
//! let block = Block::builder(&schema)
//!     .field("intro", Text::new("You are helpful.", "role"))
//!     .field("rules", Items::new(["Be kind", "Be brief"], "guidelines"))
//!     .build()
//!     .unwrap();
//!
//! let xml = render_markup(&block).unwrap();
//! assert!(xml.contains("<role>You are helpful.</role>"));
//!
//! let json = render_data(&block).unwrap();
//! assert_eq!(parse_markup(&xml).unwrap(), parse_data(&json).unwrap());
//! ```

pub mod data;
pub mod markup;
pub mod options;
pub mod renderer;
pub mod sections;
pub mod templates;
pub mod tree;

use serde::{Deserialize, Serialize};
use spof_core::{Block, FieldValue};
use thiserror::Error;

pub use options::RenderOptions;
pub use renderer::TemplateRenderer;
pub use templates::TemplatesFile;
pub use tree::{parse_data, parse_markup, FieldNode, FieldTree};

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported field at {path}: {kind} cannot be rendered inside a list")]
    UnsupportedField { path: String, kind: String },
    #[error("Non-finite number at {path} has no data representation")]
    NonFiniteNumber { path: String },
    #[error("Template failed: {0}")]
    Template(String),
    #[error("Serialize failed: {0}")]
    Serialize(String),
    #[error("Parse failed: {0}")]
    Parse(String),
    #[error("Config failed: {0}")]
    Config(String),
}

/// Output representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Markup,
    Sections,
    Data,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Markup, Format::Sections, Format::Data];

    /// Conventional file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Markup => "xml",
            Format::Sections => "md",
            Format::Data => "json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Markup => "markup",
            Format::Sections => "sections",
            Format::Data => "data",
        }
    }
}

/// Renders blocks with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, block: &Block, format: Format) -> Result<String, RenderError> {
        tracing::debug!(block = block.name(), format = format.as_str(), "rendering");
        match format {
            Format::Markup => markup::render(block, &self.options),
            Format::Sections => sections::render(block, &self.options),
            Format::Data => data::render(block, &self.options),
        }
    }
}

/// Render with default options in the given format
pub fn render(block: &Block, format: Format) -> Result<String, RenderError> {
    Renderer::default().render(block, format)
}

/// Nested tagged-markup document
pub fn render_markup(block: &Block) -> Result<String, RenderError> {
    render(block, Format::Markup)
}

/// Heading-structured Markdown document
pub fn render_sections(block: &Block) -> Result<String, RenderError> {
    render(block, Format::Sections)
}

/// Insertion-ordered JSON document
pub fn render_data(block: &Block) -> Result<String, RenderError> {
    render(block, Format::Data)
}

/// Render a block's data view through an inline Handlebars template
pub fn render_template(block: &Block, template: &str) -> Result<String, RenderError> {
    let renderer = TemplateRenderer::new(TemplatesFile::default());
    renderer.render_string(template, block)
}

/// Wrapper kinds and optional slots only make sense as named fields; a
/// list holding one has no layout in any format.
pub(crate) fn check_list_element(value: &FieldValue, path: &str) -> Result<(), RenderError> {
    match value {
        FieldValue::OptionalBlock(_) | FieldValue::Text(_) | FieldValue::Items(_) => {
            Err(RenderError::UnsupportedField {
                path: path.to_string(),
                kind: value.kind_name(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spof_core::{FieldKind, Schema, Text};

    #[test]
    fn test_format_extensions() {
        let exts: Vec<_> = Format::ALL.iter().map(|f| f.extension()).collect();
        assert_eq!(exts, vec!["xml", "md", "json"]);
    }

    #[test]
    fn test_wrapper_inside_list_is_rejected() {
        let schema = Schema::new("odd").list("notes", FieldKind::Text);
        let block = Block::builder(&schema)
            .field("notes", vec![Text::new("hi", "note")])
            .build()
            .unwrap();

        for format in Format::ALL {
            let err = render(&block, format).unwrap_err();
            assert!(
                matches!(err, RenderError::UnsupportedField { ref path, .. } if path == "odd.notes[0]"),
                "{format:?}: {err}"
            );
        }
    }

    #[test]
    fn test_inline_template() {
        let schema = Schema::new("greeting").text("intro");
        let block = Block::builder(&schema)
            .field("intro", Text::new("World", "name"))
            .build()
            .unwrap();

        let out = render_template(&block, "Hello, {{name}}!").unwrap();
        assert_eq!(out, "Hello, World!");
    }
}
