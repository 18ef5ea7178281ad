//! Template loading for custom output formats.
//!
//! A templates file names one Handlebars template per custom format:
//!
//! ```yaml
//! version: "1.0"
//! templates:
//!   brief:
//!     description: One-line persona summary
//!     template: "{{personality.name}}: {{join personality.traits \", \"}}"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::RenderError;

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    #[serde(default)]
    pub templates: BTreeMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub description: String,
    pub template: String,
}

impl Default for TemplatesFile {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            templates: BTreeMap::new(),
        }
    }
}

impl TemplatesFile {
    /// Load templates from a YAML file
    pub fn load(path: &str) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Template(format!("Failed to read templates file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::Template(format!("Failed to parse templates YAML: {}", e)))
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// List all template names
    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_templates_file() {
        let yaml = r#"
version: "1.0"
templates:
  brief:
    description: Persona line
    template: "{{personality.name}}"
  bare:
    template: "{{role}}"
"#;

        let file = TemplatesFile::from_yaml(yaml).unwrap();
        assert_eq!(file.list_templates(), vec!["bare", "brief"]);
        assert_eq!(file.get("brief").unwrap().description, "Persona line");
        assert_eq!(file.get("bare").unwrap().description, "");
    }

    #[test]
    fn test_missing_version_is_an_error() {
        assert!(matches!(
            TemplatesFile::from_yaml("templates: {}\n"),
            Err(RenderError::Template(_))
        ));
    }
}
