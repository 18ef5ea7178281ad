//! SPOF Core: instruction blocks for structured prompts
//!
//! A block is a named, ordered set of fields checked against a [`Schema`].
//! Field order is part of the content: it decides the order in which
//! sections reach whoever reads the rendered prompt.
//!
//! # Example
//!
//! ```
//! use spof_core::{Block, FieldKind, Items, ScalarType, Schema, Text};
//!
//! let schema = Schema::new("directions")
//!     .text("intro")
//!     .list("primary_goals", FieldKind::Scalar(ScalarType::Str))
//!     .items("safety_rules");
//!
//! let block = Block::builder(&schema)
//!     .field("intro", Text::new("Follow these directions.", "role"))
//!     .field("primary_goals", vec!["Listen carefully"])
//!     .field("safety_rules", Items::new(["Protect user privacy"], "safety"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(block.fields()[2].label(), "safety");
//! ```

pub mod block;
pub mod error;
pub mod record;
pub mod schema;

pub use block::{
    format_float, is_element_name, Block, BlockBuilder, Field, FieldValue, Items, Scalar, Text,
    LIST_ITEM,
};
pub use error::ValidationError;
pub use record::{ChatMessage, Record, Sender, CHAT_MESSAGE_SCHEMA};
pub use schema::{FieldKind, FieldSpec, ScalarType, Schema};

/// Fixed rendering of timestamps, without timezone
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
