//! Render options, loadable from YAML.
//!
//! ```yaml
//! indent: 4
//! pretty: true
//! max_heading_depth: 4
//! ```
//!
//! Every key is optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::RenderError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Spaces per nesting level in markup and data output
    pub indent: usize,
    /// Multi-line data output; compact when false
    pub pretty: bool,
    /// Deepest Markdown heading; deeper blocks reuse this level
    pub max_heading_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            pretty: true,
            max_heading_depth: 6,
        }
    }
}

impl RenderOptions {
    /// Load options from a YAML file
    pub fn load(path: &str) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("Failed to read options file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse options from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        let options: RenderOptions =
            serde_yaml::from_str(yaml).map_err(|e| RenderError::Config(e.to_string()))?;
        if options.max_heading_depth == 0 {
            return Err(RenderError::Config(
                "max_heading_depth must be at least 1".to_string(),
            ));
        }
        Ok(options)
    }

    pub(crate) fn pad(&self, depth: usize) -> String {
        " ".repeat(self.indent * depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let options = RenderOptions::from_yaml("indent: 4\n").unwrap();
        assert_eq!(options.indent, 4);
        assert!(options.pretty);
        assert_eq!(options.max_heading_depth, 6);
    }

    #[test]
    fn test_rejects_unknown_keys_and_zero_depth() {
        assert!(matches!(
            RenderOptions::from_yaml("colour: blue\n"),
            Err(RenderError::Config(_))
        ));
        assert!(matches!(
            RenderOptions::from_yaml("max_heading_depth: 0\n"),
            Err(RenderError::Config(_))
        ));
    }
}
