//! The root chatbot prompt.
use once_cell::sync::Lazy;
use spof_core::{Block, ChatMessage, Schema, Text, ValidationError};
use spof_render::{Format, RenderError, Renderer};

use crate::blocks::{
    conversation_history_block, current_context_block, directions_block, personality_block,
};
use crate::context::PromptContext;

pub const INTRODUCTION: &str =
    "You are Alex, a helpful AI assistant. Respond naturally and helpfully to user messages.";

pub const FINAL_INSTRUCTION: &str = "Based on the user's message and conversation context, \
provide a helpful, friendly response that follows your personality and guidelines.";

// Field order is prompt precedence: framing, persona, rules, history,
// the live turn, then the task.
pub static CHATBOT_PROMPT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("chatbot_prompt")
        .text("introduction")
        .block("personality", "personality")
        .block("directions", "directions")
        .optional_block("conversation_history", "conversation_history")
        .block("current_context", "current_context")
        .text("final_instruction")
});

/// A complete chatbot prompt, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct ChatbotPrompt {
    block: Block,
}

impl ChatbotPrompt {
    /// Compose the prompt for one user turn.
    ///
    /// An empty or absent history leaves the history block out entirely.
    pub fn new(
        user_message: &str,
        conversation_history: Option<&[ChatMessage]>,
        ctx: &PromptContext,
    ) -> Result<Self, ValidationError> {
        let history = match conversation_history {
            Some(messages) if !messages.is_empty() => {
                Some(conversation_history_block(messages, ctx.history_limit)?)
            }
            _ => None,
        };

        let block = Block::builder(&CHATBOT_PROMPT_SCHEMA)
            .field("introduction", Text::new(INTRODUCTION, "role"))
            .field("personality", personality_block()?)
            .field("directions", directions_block()?)
            .field("conversation_history", history)
            .field(
                "current_context",
                current_context_block(user_message, ctx.now, &ctx.session_info)?,
            )
            .field("final_instruction", Text::new(FINAL_INSTRUCTION, "task"))
            .build()?;

        tracing::debug!(
            has_history = block.child("conversation_history").is_some(),
            "composed chatbot prompt"
        );
        Ok(Self { block })
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn into_block(self) -> Block {
        self.block
    }

    pub fn render(&self, format: Format) -> Result<String, RenderError> {
        self.render_with(&Renderer::default(), format)
    }

    pub fn render_with(&self, renderer: &Renderer, format: Format) -> Result<String, RenderError> {
        renderer.render(&self.block, format)
    }

    pub fn to_markup(&self) -> Result<String, RenderError> {
        self.render(Format::Markup)
    }

    pub fn to_sections(&self) -> Result<String, RenderError> {
        self.render(Format::Sections)
    }

    pub fn to_data(&self) -> Result<String, RenderError> {
        self.render(Format::Data)
    }
}
