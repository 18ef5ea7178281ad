//! Data rendering: an insertion-ordered JSON object of objects.
//!
//! The root block becomes `{ "<block name>": { ... } }`. Wrappers are
//! unwrapped to their raw content: `Text` to a string, `Items` to an array.
use serde::Serialize;
use serde_json::{Map, Number, Value};
use spof_core::{Block, FieldValue, Scalar};

use crate::{check_list_element, RenderError, RenderOptions};

pub fn render(block: &Block, options: &RenderOptions) -> Result<String, RenderError> {
    let value = to_value(block)?;
    if !options.pretty {
        return serde_json::to_string(&value).map_err(|e| RenderError::Serialize(e.to_string()));
    }

    let indent = " ".repeat(options.indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| RenderError::Serialize(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| RenderError::Serialize(e.to_string()))
}

/// JSON view of a block, keyed by its name
pub fn to_value(block: &Block) -> Result<Value, RenderError> {
    let mut root = Map::new();
    root.insert(block.name().to_string(), block_value(block, block.name())?);
    Ok(Value::Object(root))
}

/// JSON object of a block's present fields, without the name wrapper
pub fn block_value(block: &Block, path: &str) -> Result<Value, RenderError> {
    let mut map = Map::new();
    for field in block.present_fields() {
        let label = field.label();
        let value = field_value(&field.value, &format!("{}.{}", path, label))?;
        map.insert(label.to_string(), value);
    }
    Ok(Value::Object(map))
}

fn field_value(value: &FieldValue, path: &str) -> Result<Value, RenderError> {
    Ok(match value {
        FieldValue::Scalar(s) => scalar_value(s, path)?,
        FieldValue::List(values) => Value::Array(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let item_path = format!("{}[{}]", path, i);
                    check_list_element(v, &item_path)?;
                    field_value(v, &item_path)
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        FieldValue::Block(b) | FieldValue::OptionalBlock(Some(b)) => block_value(b, path)?,
        FieldValue::OptionalBlock(None) => Value::Null,
        FieldValue::Text(t) => Value::String(t.content.clone()),
        FieldValue::Items(items) => Value::Array(
            items
                .items
                .iter()
                .map(|s| Value::String(s.clone()))
                .collect(),
        ),
    })
}

fn scalar_value(scalar: &Scalar, path: &str) -> Result<Value, RenderError> {
    Ok(match scalar {
        Scalar::Int(n) => Value::Number((*n).into()),
        Scalar::Float(n) => Number::from_f64(*n)
            .map(Value::Number)
            .ok_or_else(|| RenderError::NonFiniteNumber {
                path: path.to_string(),
            })?,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Str(_) | Scalar::Timestamp(_) => Value::String(scalar.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spof_core::{ScalarType, Schema};

    fn stats(ratio: f64) -> Block {
        let schema = Schema::new("stats")
            .scalar("count", ScalarType::Int)
            .scalar("ratio", ScalarType::Float)
            .scalar("done", ScalarType::Bool);
        Block::builder(&schema)
            .field("count", 3i64)
            .field("ratio", ratio)
            .field("done", false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_primitives_keep_their_json_types() {
        let value = to_value(&stats(0.5)).unwrap();
        assert_eq!(value, json!({ "stats": { "count": 3, "ratio": 0.5, "done": false } }));
    }

    #[test]
    fn test_non_finite_float_is_an_error() {
        let err = to_value(&stats(f64::NAN)).unwrap_err();
        assert!(matches!(err, RenderError::NonFiniteNumber { ref path } if path == "stats.ratio"));
    }

    #[test]
    fn test_compact_output() {
        let options = RenderOptions {
            pretty: false,
            ..Default::default()
        };
        let out = render(&stats(1.0), &options).unwrap();
        assert_eq!(out, r#"{"stats":{"count":3,"ratio":1.0,"done":false}}"#);
    }
}
