//! Schema descriptors: the ordered field layout a block type declares.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Str,
    Int,
    Float,
    Bool,
    Timestamp,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// How a field is stored and, by extension, how renderers lay it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar(ScalarType),
    /// Ordered sequence; the element kind is checked for every element.
    List(Box<FieldKind>),
    /// Nested block carrying the given block name.
    Block(String),
    /// Nested block that may be absent; absent values are omitted on render.
    OptionalBlock(String),
    /// Narrative prose rendered as one element under its own name.
    Text,
    /// Short string list rendered under its own sub-heading.
    Items,
}

impl FieldKind {
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::OptionalBlock(_))
    }

    /// Name of the block this kind nests, looking through lists
    pub fn block_name(&self) -> Option<&str> {
        match self {
            Self::Block(name) | Self::OptionalBlock(name) => Some(name),
            Self::List(element) => element.block_name(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar(t) => write!(f, "{}", t),
            Self::List(inner) => write!(f, "list<{}>", inner),
            Self::Block(name) => write!(f, "block<{}>", name),
            Self::OptionalBlock(name) => write!(f, "optional<{}>", name),
            Self::Text => f.write_str("text"),
            Self::Items => f.write_str("items"),
        }
    }
}

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

/// Ordered field layout of a block type.
///
/// Declaration order is rendering order. Schemas are meant to be built once
/// and shared, usually from a `once_cell::sync::Lazy` static:
///
/// ```
/// use spof_core::{Schema, ScalarType, FieldKind};
///
/// let schema = Schema::new("personality")
///     .scalar("name", ScalarType::Str)
///     .list("traits", FieldKind::Scalar(ScalarType::Str))
///     .scalar("communication_style", ScalarType::Str);
///
/// assert_eq!(schema.field_names(), vec!["name", "traits", "communication_style"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field of any kind
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn scalar(self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.field(name, FieldKind::Scalar(ty))
    }

    pub fn list(self, name: impl Into<String>, element: FieldKind) -> Self {
        self.field(name, FieldKind::List(Box::new(element)))
    }

    pub fn block(self, name: impl Into<String>, block_name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Block(block_name.into()))
    }

    pub fn optional_block(self, name: impl Into<String>, block_name: impl Into<String>) -> Self {
        self.field(name, FieldKind::OptionalBlock(block_name.into()))
    }

    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Text)
    }

    pub fn items(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Items)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_kept() {
        let schema = Schema::new("directions")
            .list("primary_goals", FieldKind::Scalar(ScalarType::Str))
            .items("response_guidelines")
            .items("safety_rules");

        assert_eq!(schema.name(), "directions");
        assert_eq!(
            schema.field_names(),
            vec!["primary_goals", "response_guidelines", "safety_rules"]
        );
        assert_eq!(schema.get("safety_rules").unwrap().kind, FieldKind::Items);
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn test_kind_display() {
        let kind = FieldKind::List(Box::new(FieldKind::Block("chat_message".to_string())));
        assert_eq!(kind.to_string(), "list<block<chat_message>>");
        assert!(FieldKind::OptionalBlock("x".to_string()).is_optional());
        assert!(!FieldKind::Text.is_optional());
        assert_eq!(kind.block_name(), Some("chat_message"));
        assert_eq!(FieldKind::Items.block_name(), None);
    }
}
