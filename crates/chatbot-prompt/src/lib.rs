//! Chatbot Prompt: a structured system prompt built from instruction blocks
//!
//! ```text
//! chatbot_prompt
//!   ├─ role                  (Text)
//!   ├─ personality           (fixed persona)
//!   ├─ directions            (goals + guidelines + safety)
//!   ├─ conversation_history  (optional, last N messages)
//!   ├─ current_context       (user message + timestamp)
//!   └─ task                  (Text)
//! ```
//!
//! # Example
//!
//! ```
//! use chatbot_prompt::{ChatbotPrompt, PromptContext};
//!
//! let prompt = ChatbotPrompt::new("hello", None, &PromptContext::now()).unwrap();
//! let md = prompt.to_sections().unwrap();
//! assert!(md.starts_with("# chatbot_prompt"));
//! assert!(!md.contains("conversation_history"));
//! ```

pub mod blocks;
pub mod context;
pub mod example;
pub mod output;
pub mod prompt;

pub use context::{PromptContext, DEFAULT_HISTORY_LIMIT};
pub use output::{output_path, write_outputs, OutputError, OutputReport};
pub use prompt::{ChatbotPrompt, FINAL_INSTRUCTION, INTRODUCTION};
