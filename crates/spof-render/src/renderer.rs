//! Template rendering over a block's data view.
//!
//! Uses Handlebars with custom helpers:
//! - join: Join array with separator
//! - bullets: One `- item` line per array element
//! - default: Fallback for missing values
//! - truncate: Truncate string to max length
//!
//! Templates see the root block's fields directly, keyed by label, so
//! `{{personality.name}}` reads the `name` field of the nested
//! `personality` block.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};
use serde_json::Value;
use spof_core::Block;

use crate::data::block_value;
use crate::templates::TemplatesFile;
use crate::RenderError;

/// Compiled renderer with registered helpers
pub struct TemplateRenderer<'a> {
    handlebars: Handlebars<'a>,
    templates: TemplatesFile,
}

impl<'a> TemplateRenderer<'a> {
    /// Create a new renderer from a templates file.
    ///
    /// Templates that fail to compile are skipped with a warning; rendering
    /// them later reports the missing template.
    pub fn new(templates: TemplatesFile) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // prompts are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("join", Box::new(JoinHelper));
        handlebars.register_helper("bullets", Box::new(BulletsHelper));
        handlebars.register_helper("default", Box::new(DefaultHelper));
        handlebars.register_helper("truncate", Box::new(TruncateHelper));

        for (name, template) in &templates.templates {
            if let Err(e) = handlebars.register_template_string(name, &template.template) {
                tracing::warn!(template = %name, error = %e, "skipping template");
            }
        }

        TemplateRenderer {
            handlebars,
            templates,
        }
    }

    /// Load from a file path
    pub fn load(path: &str) -> Result<Self, RenderError> {
        Ok(Self::new(TemplatesFile::load(path)?))
    }

    /// Render a named template over a block
    pub fn render(&self, template_name: &str, block: &Block) -> Result<String, RenderError> {
        let data = block_value(block, block.name())?;
        self.render_value(template_name, &data)
    }

    /// Render a named template over raw data
    pub fn render_value(&self, template_name: &str, data: &Value) -> Result<String, RenderError> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| RenderError::Template(format!("Render error: {}", e)))
    }

    /// Render a template string directly (not from file)
    pub fn render_string(&self, template: &str, block: &Block) -> Result<String, RenderError> {
        let data = block_value(block, block.name())?;
        self.handlebars
            .render_template(template, &data)
            .map_err(|e| RenderError::Template(format!("Render error: {}", e)))
    }

    /// List available template names
    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.list_templates()
    }
}

// ============================================================================
// Custom Helpers
// ============================================================================

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Join an array with a separator
struct JoinHelper;

impl HelperDef for JoinHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let array = h.param(0).and_then(|v| v.value().as_array());

        let separator = h
            .param(1)
            .and_then(|v| v.value().as_str())
            .unwrap_or(", ");

        if let Some(arr) = array {
            let strings: Vec<String> = arr.iter().map(display).collect();
            out.write(&strings.join(separator))?;
        }

        Ok(())
    }
}

/// Render an array as Markdown bullets
struct BulletsHelper;

impl HelperDef for BulletsHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        if let Some(arr) = h.param(0).and_then(|v| v.value().as_array()) {
            for item in arr {
                out.write("- ")?;
                out.write(&display(item))?;
                out.write("\n")?;
            }
        }
        Ok(())
    }
}

/// Default value helper
struct DefaultHelper;

impl HelperDef for DefaultHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).map(|v| v.value());
        let default = h
            .param(1)
            .and_then(|v| v.value().as_str())
            .unwrap_or("");

        match value {
            Some(v) if !v.is_null() => out.write(&display(v))?,
            _ => out.write(default)?,
        }

        Ok(())
    }
}

/// Truncate a string to max length with ellipsis
struct TruncateHelper;

impl HelperDef for TruncateHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let text = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");

        let max_chars = h.param(1).and_then(|v| v.value().as_u64()).unwrap_or(100) as usize;

        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => {
                out.write(&text[..cut])?;
                out.write("...")?;
            }
            None => out.write(text)?,
        }
        Ok(())
    }
}
