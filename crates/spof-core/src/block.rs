//! Instruction blocks: named, ordered field aggregates validated against a
//! [`Schema`].
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::schema::{FieldKind, ScalarType, Schema};
use crate::TIMESTAMP_FORMAT;

/// Element name renderers use for list members
pub const LIST_ITEM: &str = "item";

/// Primitive field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
}

impl Scalar {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Str(_) => ScalarType::Str,
            Self::Int(_) => ScalarType::Int,
            Self::Float(_) => ScalarType::Float,
            Self::Bool(_) => ScalarType::Bool,
            Self::Timestamp(_) => ScalarType::Timestamp,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => f.write_str(&format_float(*n)),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// Formats a float the way JSON writers do: integral values keep a `.0`.
pub fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

/// Narrative prose tagged with the element name it renders under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub block_name: String,
}

impl Text {
    pub fn new(content: impl Into<String>, block_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            block_name: block_name.into(),
        }
    }
}

/// Short string list rendered as a labelled list under `block_name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Items {
    pub items: Vec<String>,
    pub block_name: String,
}

impl Items {
    pub fn new<I, S>(items: I, block_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            block_name: block_name.into(),
        }
    }
}

/// Value held by one field of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Scalar(Scalar),
    List(Vec<FieldValue>),
    Block(Block),
    OptionalBlock(Option<Block>),
    Text(Text),
    Items(Items),
}

impl FieldValue {
    /// Short kind description used in error messages
    pub fn kind_name(&self) -> String {
        match self {
            Self::Scalar(s) => s.scalar_type().to_string(),
            Self::List(_) => "list".to_string(),
            Self::Block(b) => format!("block<{}>", b.name()),
            Self::OptionalBlock(Some(b)) => format!("optional<{}>", b.name()),
            Self::OptionalBlock(None) => "optional<none>".to_string(),
            Self::Text(_) => "text".to_string(),
            Self::Items(_) => "items".to_string(),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(Scalar::Str(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(Scalar::Str(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(Scalar::Int(value))
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Scalar(Scalar::Int(i64::try_from(value).unwrap_or(i64::MAX)))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(Scalar::Bool(value))
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Scalar(Scalar::Timestamp(value))
    }
}

impl From<Block> for FieldValue {
    fn from(value: Block) -> Self {
        FieldValue::Block(value)
    }
}

impl From<Option<Block>> for FieldValue {
    fn from(value: Option<Block>) -> Self {
        FieldValue::OptionalBlock(value)
    }
}

impl From<Text> for FieldValue {
    fn from(value: Text) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Items> for FieldValue {
    fn from(value: Items) -> Self {
        FieldValue::Items(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// A named field inside a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    /// Name the field renders under in every output format.
    ///
    /// Wrappers and nested blocks carry their own name; plain values use
    /// the field name.
    pub fn label(&self) -> &str {
        match &self.value {
            FieldValue::Text(t) => &t.block_name,
            FieldValue::Items(i) => &i.block_name,
            FieldValue::Block(b) | FieldValue::OptionalBlock(Some(b)) => b.name(),
            _ => &self.name,
        }
    }

    /// False only for an absent optional block
    pub fn is_present(&self) -> bool {
        !matches!(self.value, FieldValue::OptionalBlock(None))
    }
}

/// A validated instruction block.
///
/// Fields are stored in schema declaration order, which is also the order
/// every renderer emits them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    name: String,
    fields: Vec<Field>,
}

impl Block {
    pub fn builder(schema: &Schema) -> BlockBuilder<'_> {
        BlockBuilder {
            schema,
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields that will appear in rendered output
    pub fn present_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_present())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| &f.value)
    }

    /// Nested block under `field`, if set
    pub fn child(&self, field: &str) -> Option<&Block> {
        match self.get(field)? {
            FieldValue::Block(b) | FieldValue::OptionalBlock(Some(b)) => Some(b),
            _ => None,
        }
    }
}

/// Collects field values and validates them against a schema
pub struct BlockBuilder<'s> {
    schema: &'s Schema,
    values: Vec<(String, FieldValue)>,
}

impl<'s> BlockBuilder<'s> {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<Block, ValidationError> {
        let block_name = self.schema.name().to_string();
        check_label(&block_name, &block_name)?;
        for spec in self.schema.fields() {
            if let Some(nested) = spec.kind.block_name() {
                check_label(&block_name, nested)?;
            }
        }
        let mut supplied = self.values;

        for (i, (name, _)) in supplied.iter().enumerate() {
            if self.schema.get(name).is_none() {
                return Err(ValidationError::UnknownField {
                    block: block_name,
                    field: name.clone(),
                });
            }
            if supplied[..i].iter().any(|(earlier, _)| earlier == name) {
                return Err(ValidationError::DuplicateField {
                    block: block_name,
                    field: name.clone(),
                });
            }
        }

        let mut fields = Vec::with_capacity(self.schema.fields().len());
        for spec in self.schema.fields() {
            let value = match supplied.iter().position(|(name, _)| *name == spec.name) {
                Some(pos) => supplied.swap_remove(pos).1,
                None if spec.kind.is_optional() => FieldValue::OptionalBlock(None),
                None => {
                    return Err(ValidationError::MissingField {
                        block: block_name,
                        field: spec.name.clone(),
                    })
                }
            };
            let value = coerce(&spec.kind, value, &spec.name)?;
            fields.push(Field {
                name: spec.name.clone(),
                value,
            });
        }

        let mut labels: Vec<&str> = Vec::new();
        for field in fields.iter().filter(|f| f.is_present()) {
            let label = field.label();
            check_label(&block_name, label)?;
            if labels.contains(&label) {
                return Err(ValidationError::DuplicateLabel {
                    block: block_name,
                    label: label.to_string(),
                });
            }
            labels.push(label);
        }

        tracing::debug!(block = %block_name, fields = fields.len(), "built block");
        Ok(Block {
            name: block_name,
            fields,
        })
    }
}

/// True if `name` can be written as an XML element name (an NCName).
pub fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

// Block names and labels become element names and section titles; `item`
// belongs to list members.
fn check_label(block: &str, label: &str) -> Result<(), ValidationError> {
    if label == LIST_ITEM {
        return Err(ValidationError::ReservedLabel {
            block: block.to_string(),
            label: label.to_string(),
        });
    }
    if !is_element_name(label) {
        return Err(ValidationError::InvalidLabel {
            block: block.to_string(),
            label: label.to_string(),
        });
    }
    Ok(())
}

/// Checks a value against its declared kind, promoting a plain block into
/// an optional slot.
fn coerce(kind: &FieldKind, value: FieldValue, path: &str) -> Result<FieldValue, ValidationError> {
    let mismatch = |value: &FieldValue| ValidationError::TypeMismatch {
        field: path.to_string(),
        expected: kind.to_string(),
        found: value.kind_name(),
    };

    match (kind, value) {
        (FieldKind::Scalar(ty), FieldValue::Scalar(s)) if s.scalar_type() == *ty => {
            Ok(FieldValue::Scalar(s))
        }
        (FieldKind::List(element), FieldValue::List(values)) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| coerce(element, v, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        (FieldKind::Block(name), FieldValue::Block(b)) if b.name() == name => {
            Ok(FieldValue::Block(b))
        }
        (FieldKind::OptionalBlock(name), FieldValue::Block(b)) if b.name() == name => {
            Ok(FieldValue::OptionalBlock(Some(b)))
        }
        (FieldKind::OptionalBlock(name), FieldValue::OptionalBlock(b))
            if b.as_ref().map_or(true, |b| b.name() == name) =>
        {
            Ok(FieldValue::OptionalBlock(b))
        }
        (FieldKind::Text, FieldValue::Text(t)) => Ok(FieldValue::Text(t)),
        (FieldKind::Items, FieldValue::Items(i)) => Ok(FieldValue::Items(i)),
        (_, other) => Err(mismatch(&other)),
    }
}
