//! Typed records: immutable, schema-validated values that appear inside
//! blocks as list elements.
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::block::Block;
use crate::error::ValidationError;
use crate::schema::{ScalarType, Schema};

/// A value that can be viewed as an instruction block
pub trait Record {
    fn schema() -> &'static Schema
    where
        Self: Sized;

    fn to_block(&self) -> Result<Block, ValidationError>;
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub const ALLOWED: [&'static str; 2] = ["User", "Assistant"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Assistant" => Ok(Self::Assistant),
            other => Err(ValidationError::InvalidValue {
                field: "sender".to_string(),
                value: other.to_string(),
                allowed: Self::ALLOWED.join(", "),
            }),
        }
    }
}

pub static CHAT_MESSAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("chat_message")
        .scalar("sender", ScalarType::Str)
        .scalar("timestamp", ScalarType::Timestamp)
        .scalar("content", ScalarType::Str)
});

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatMessage {
    sender: Sender,
    #[serde(with = "timestamp_format")]
    timestamp: NaiveDateTime,
    content: String,
}

impl ChatMessage {
    pub fn new(sender: Sender, timestamp: NaiveDateTime, content: impl Into<String>) -> Self {
        Self {
            sender,
            timestamp,
            content: content.into(),
        }
    }

    /// Construct from an untyped sender name
    pub fn parse(
        sender: &str,
        timestamp: NaiveDateTime,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(sender.parse()?, timestamp, content))
    }

    /// Parse a message from its JSON form, e.g.
    /// `{"sender": "User", "timestamp": "2025-09-06 14:30:00", "content": "Hi"}`
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let raw: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;

        // Checked up front so a bad sender surfaces as InvalidValue rather
        // than a generic serde message.
        if let Some(sender) = raw.get("sender").and_then(|v| v.as_str()) {
            sender.parse::<Sender>()?;
        }
        for field in ["sender", "timestamp", "content"] {
            if raw.get(field).is_none() {
                return Err(ValidationError::MissingField {
                    block: "chat_message".to_string(),
                    field: field.to_string(),
                });
            }
        }

        serde_json::from_value(raw).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Record for ChatMessage {
    fn schema() -> &'static Schema {
        &CHAT_MESSAGE_SCHEMA
    }

    fn to_block(&self) -> Result<Block, ValidationError> {
        Block::builder(Self::schema())
            .field("sender", self.sender.as_str())
            .field("timestamp", self.timestamp)
            .field("content", self.content.as_str())
            .build()
    }
}

/// Serde adapter writing timestamps as `YYYY-MM-DD HH:MM:SS`
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::TIMESTAMP_FORMAT;

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
