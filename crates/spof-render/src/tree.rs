//! Format-neutral field tree and the parsers that recover it from markup
//! and data output.
//!
//! Scalars are compared by their rendered text, so `3` in data output and
//! `<n>3</n>` in markup both recover as `Value("3")`. Empty lists and empty
//! blocks both recover as an empty list since markup draws them the same.
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use spof_core::{format_float, Block, FieldValue, LIST_ITEM};

use crate::{check_list_element, RenderError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNode {
    Value(String),
    List(Vec<FieldNode>),
    Fields(Vec<(String, FieldNode)>),
}

impl FieldNode {
    /// Block node; empty blocks collapse to an empty list
    pub fn fields(fields: Vec<(String, FieldNode)>) -> Self {
        if fields.is_empty() {
            FieldNode::List(Vec::new())
        } else {
            FieldNode::Fields(fields)
        }
    }

    pub fn get(&self, label: &str) -> Option<&FieldNode> {
        match self {
            FieldNode::Fields(fields) => fields.iter().find(|(k, _)| k == label).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldNode::Value(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldNode]> {
        match self {
            FieldNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Labels of a block node, in order
    pub fn labels(&self) -> Vec<&str> {
        match self {
            FieldNode::Fields(fields) => fields.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Root name plus the field tree under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTree {
    pub root: String,
    pub node: FieldNode,
}

impl FieldTree {
    pub fn from_block(block: &Block) -> Result<Self, RenderError> {
        Ok(Self {
            root: block.name().to_string(),
            node: block_node(block, block.name())?,
        })
    }

    /// Follow a dotted label path, e.g. `"personality.name"`
    pub fn lookup(&self, path: &str) -> Option<&FieldNode> {
        path.split('.')
            .try_fold(&self.node, |node, label| node.get(label))
    }
}

fn block_node(block: &Block, path: &str) -> Result<FieldNode, RenderError> {
    let fields = block
        .present_fields()
        .map(|f| {
            let label = f.label();
            Ok((label.to_string(), value_node(&f.value, &format!("{}.{}", path, label))?))
        })
        .collect::<Result<Vec<_>, RenderError>>()?;
    Ok(FieldNode::fields(fields))
}

fn value_node(value: &FieldValue, path: &str) -> Result<FieldNode, RenderError> {
    Ok(match value {
        FieldValue::Scalar(s) => FieldNode::Value(s.to_string()),
        FieldValue::List(values) => FieldNode::List(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let item_path = format!("{}[{}]", path, i);
                    check_list_element(v, &item_path)?;
                    value_node(v, &item_path)
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        FieldValue::Block(b) | FieldValue::OptionalBlock(Some(b)) => block_node(b, path)?,
        FieldValue::OptionalBlock(None) => FieldNode::List(Vec::new()),
        FieldValue::Text(t) => FieldNode::Value(t.content.clone()),
        FieldValue::Items(items) => FieldNode::List(
            items
                .items
                .iter()
                .map(|s| FieldNode::Value(s.clone()))
                .collect(),
        ),
    })
}

// ============================================================================
// Data parser
// ============================================================================

/// Recover the field tree from data (JSON) output
pub fn parse_data(input: &str) -> Result<FieldTree, RenderError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| RenderError::Parse(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(RenderError::Parse("data root must be an object".to_string()));
    };
    if root.len() != 1 {
        return Err(RenderError::Parse(format!(
            "data root must hold exactly one block, found {}",
            root.len()
        )));
    }
    let Some((name, body)) = root.into_iter().next() else {
        return Err(RenderError::Parse("empty data root".to_string()));
    };
    Ok(FieldTree {
        node: json_node(body)?,
        root: name,
    })
}

fn json_node(value: Value) -> Result<FieldNode, RenderError> {
    Ok(match value {
        Value::Null => return Err(RenderError::Parse("null has no field form".to_string())),
        Value::Bool(b) => FieldNode::Value(b.to_string()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldNode::Value(i.to_string()),
            None => match n.as_f64() {
                Some(f) if !n.is_u64() => FieldNode::Value(format_float(f)),
                _ => FieldNode::Value(n.to_string()),
            },
        },
        Value::String(s) => FieldNode::Value(s),
        Value::Array(items) => FieldNode::List(
            items
                .into_iter()
                .map(json_node)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(map) => FieldNode::fields(
            map.into_iter()
                .map(|(k, v)| Ok((k, json_node(v)?)))
                .collect::<Result<Vec<_>, RenderError>>()?,
        ),
    })
}

// ============================================================================
// Markup parser
// ============================================================================

struct Frame {
    name: String,
    text: String,
    children: Vec<(String, FieldNode)>,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn into_node(self) -> FieldNode {
        if self.children.is_empty() {
            return FieldNode::Value(self.text);
        }
        if self.children.iter().all(|(k, _)| k == LIST_ITEM) {
            return FieldNode::List(self.children.into_iter().map(|(_, v)| unwrap_item(v)).collect());
        }
        FieldNode::Fields(self.children)
    }
}

/// An item holding exactly one element is a wrapped block
fn unwrap_item(node: FieldNode) -> FieldNode {
    match node {
        FieldNode::Fields(mut fields) if fields.len() == 1 => fields.remove(0).1,
        other => other,
    }
}

/// Recover the field tree from markup output
pub fn parse_markup(input: &str) -> Result<FieldTree, RenderError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, FieldNode)> = None;

    let mut attach = |stack: &mut Vec<Frame>, name: String, node: FieldNode| match stack.last_mut() {
        Some(parent) => {
            parent.children.push((name, node));
            Ok(())
        }
        None if root.is_none() => {
            root = Some((name, node));
            Ok(())
        }
        None => Err(RenderError::Parse(format!("second root element <{}>", name))),
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Frame::new(element_name(e.name().as_ref())?)),
            Ok(Event::Empty(e)) => {
                let name = element_name(e.name().as_ref())?;
                attach(&mut stack, name, FieldNode::List(Vec::new()))?;
            }
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| RenderError::Parse("unbalanced closing tag".to_string()))?;
                let name = frame.name.clone();
                attach(&mut stack, name, frame.into_node())?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| RenderError::Parse(e.to_string()))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(RenderError::Parse(format!(
                            "text outside the root element: {:?}",
                            text.trim()
                        )))
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(RenderError::Parse(e.to_string())),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(RenderError::Parse(format!("unclosed element <{}>", open.name)));
    }
    let (root, node) = root.ok_or_else(|| RenderError::Parse("no root element".to_string()))?;
    Ok(FieldTree { root, node })
}

fn element_name(raw: &[u8]) -> Result<String, RenderError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| RenderError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markup_structure() {
        let tree = parse_markup(
            "<p>\n  <name>Alex</name>\n  <traits>\n    <item>a</item>\n    <item>b</item>\n  </traits>\n  <none/>\n</p>\n",
        )
        .unwrap();

        assert_eq!(tree.root, "p");
        assert_eq!(tree.node.labels(), vec!["name", "traits", "none"]);
        assert_eq!(tree.lookup("name").and_then(FieldNode::as_str), Some("Alex"));
        assert_eq!(
            tree.lookup("traits"),
            Some(&FieldNode::List(vec![
                FieldNode::Value("a".to_string()),
                FieldNode::Value("b".to_string())
            ]))
        );
        assert_eq!(tree.lookup("none"), Some(&FieldNode::List(Vec::new())));
    }

    #[test]
    fn test_parse_markup_unwraps_blocks_in_items() {
        let tree = parse_markup(
            "<log><entries><item><entry><n>1</n></entry></item></entries></log>",
        )
        .unwrap();
        let entries = tree.lookup("entries").and_then(FieldNode::as_list).unwrap();
        assert_eq!(
            entries,
            &[FieldNode::Fields(vec![("n".to_string(), FieldNode::Value("1".to_string()))])]
        );
    }

    #[test]
    fn test_parse_markup_unescapes_text() {
        let tree = parse_markup("<d><e>a &lt; b &amp; c</e></d>").unwrap();
        assert_eq!(tree.lookup("e").and_then(FieldNode::as_str), Some("a < b & c"));
    }

    #[test]
    fn test_parse_markup_rejects_broken_input() {
        assert!(parse_markup("<a><b>x</b>").is_err());
        assert!(parse_markup("<a></a><b></b>").is_err());
        assert!(parse_markup("").is_err());
    }

    #[test]
    fn test_parse_data_keeps_key_order() {
        let tree = parse_data(r#"{"p": {"z": 1, "a": [true, 2.0], "m": {}}}"#).unwrap();
        assert_eq!(tree.root, "p");
        assert_eq!(tree.node.labels(), vec!["z", "a", "m"]);
        assert_eq!(
            tree.lookup("a"),
            Some(&FieldNode::List(vec![
                FieldNode::Value("true".to_string()),
                FieldNode::Value("2.0".to_string())
            ]))
        );
        assert_eq!(tree.lookup("m"), Some(&FieldNode::List(Vec::new())));
    }

    #[test]
    fn test_parse_data_rejects_multiple_roots() {
        assert!(matches!(
            parse_data(r#"{"a": {}, "b": {}}"#),
            Err(RenderError::Parse(_))
        ));
        assert!(parse_data("[1, 2]").is_err());
    }
}
