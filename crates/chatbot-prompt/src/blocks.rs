//! The instruction blocks a chatbot prompt is assembled from.
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use spof_core::{
    Block, ChatMessage, FieldKind, Items, Record, ScalarType, Schema, ValidationError,
};

pub static PERSONALITY_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("personality")
        .scalar("name", ScalarType::Str)
        .list("traits", FieldKind::Scalar(ScalarType::Str))
        .scalar("communication_style", ScalarType::Str)
});

pub static CONVERSATION_HISTORY_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("conversation_history")
        .list("messages", FieldKind::Block(ChatMessage::schema().name().to_string()))
        .scalar("total_messages", ScalarType::Int)
});

pub static DIRECTIONS_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("directions")
        .list("primary_goals", FieldKind::Scalar(ScalarType::Str))
        .items("response_guidelines")
        .items("safety_rules")
});

pub static CURRENT_CONTEXT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("current_context")
        .scalar("timestamp", ScalarType::Timestamp)
        .scalar("user_message", ScalarType::Str)
        .scalar("session_info", ScalarType::Str)
});

/// Who the assistant is: fixed persona, no inputs
pub fn personality_block() -> Result<Block, ValidationError> {
    Block::builder(&PERSONALITY_SCHEMA)
        .field("name", "Alex")
        .field(
            "traits",
            vec![
                "Friendly and approachable",
                "Helpful and proactive",
                "Curious and engaging",
                "Professional but warm",
            ],
        )
        .field(
            "communication_style",
            "Conversational, clear, and empathetic. Use 'I' naturally when speaking.",
        )
        .build()
}

/// Recent messages, keeping the last `limit` in their original order.
///
/// `total_messages` always reports the count before truncation.
pub fn conversation_history_block(
    messages: &[ChatMessage],
    limit: usize,
) -> Result<Block, ValidationError> {
    let start = messages.len().saturating_sub(limit);
    if start > 0 {
        tracing::debug!(
            total = messages.len(),
            kept = messages.len() - start,
            "truncating conversation history"
        );
    }

    let kept = messages[start..]
        .iter()
        .map(Record::to_block)
        .collect::<Result<Vec<_>, _>>()?;

    Block::builder(&CONVERSATION_HISTORY_SCHEMA)
        .field("messages", kept)
        .field("total_messages", messages.len())
        .build()
}

/// Goals, response guidelines and safety rules
pub fn directions_block() -> Result<Block, ValidationError> {
    Block::builder(&DIRECTIONS_SCHEMA)
        .field(
            "primary_goals",
            vec![
                "Listen carefully to understand user needs",
                "Provide helpful, accurate information",
                "Ask clarifying questions when needed",
                "Maintain a friendly, professional tone",
            ],
        )
        .field(
            "response_guidelines",
            Items::new(
                [
                    "Keep responses concise but thorough",
                    "Use examples when helpful",
                    "Acknowledge when you don't know something",
                    "Offer follow-up suggestions",
                ],
                "guidelines",
            ),
        )
        .field(
            "safety_rules",
            Items::new(
                [
                    "Never provide harmful or dangerous advice",
                    "Protect user privacy and data",
                    "Be respectful of all individuals and groups",
                    "Decline inappropriate requests politely",
                ],
                "safety",
            ),
        )
        .build()
}

/// The live turn: what the user just said and when
pub fn current_context_block(
    user_message: &str,
    now: NaiveDateTime,
    session_info: &str,
) -> Result<Block, ValidationError> {
    Block::builder(&CURRENT_CONTEXT_SCHEMA)
        .field("timestamp", now)
        .field("user_message", user_message)
        .field("session_info", session_info)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use spof_core::{FieldValue, Sender};

    fn messages(n: usize) -> Vec<ChatMessage> {
        let start = NaiveDate::from_ymd_opt(2025, 9, 6)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
                ChatMessage::new(sender, start + Duration::minutes(i as i64), format!("msg {}", i))
            })
            .collect()
    }

    fn contents(block: &Block) -> Vec<String> {
        match block.get("messages") {
            Some(FieldValue::List(items)) => items
                .iter()
                .map(|item| match item {
                    FieldValue::Block(b) => match b.get("content") {
                        Some(FieldValue::Scalar(s)) => s.to_string(),
                        other => panic!("unexpected content: {other:?}"),
                    },
                    other => panic!("unexpected item: {other:?}"),
                })
                .collect(),
            other => panic!("unexpected messages: {other:?}"),
        }
    }

    #[test]
    fn test_history_keeps_last_ten() {
        let block = conversation_history_block(&messages(13), 10).unwrap();
        let expected: Vec<String> = (3..13).map(|i| format!("msg {}", i)).collect();
        assert_eq!(contents(&block), expected);
        assert_eq!(block.get("total_messages"), Some(&FieldValue::from(13usize)));
    }

    #[test]
    fn test_history_under_limit_keeps_all() {
        for n in [1, 4, 10] {
            let block = conversation_history_block(&messages(n), 10).unwrap();
            assert_eq!(contents(&block).len(), n);
            assert_eq!(block.get("total_messages"), Some(&FieldValue::from(n)));
        }
    }

    #[test]
    fn test_history_limit_is_configurable() {
        let block = conversation_history_block(&messages(5), 2).unwrap();
        assert_eq!(contents(&block), vec!["msg 3", "msg 4"]);
        assert_eq!(block.get("total_messages"), Some(&FieldValue::from(5usize)));
    }

    #[test]
    fn test_static_blocks() {
        let personality = personality_block().unwrap();
        assert_eq!(personality.get("name"), Some(&FieldValue::from("Alex")));

        let directions = directions_block().unwrap();
        let labels: Vec<_> = directions.fields().iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["primary_goals", "guidelines", "safety"]);
    }

    #[test]
    fn test_current_context_uses_injected_time() {
        let now = NaiveDate::from_ymd_opt(2025, 9, 6)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let block = current_context_block("Hi", now, "New conversation session").unwrap();
        assert_eq!(block.get("timestamp"), Some(&FieldValue::from(now)));
        assert_eq!(block.get("user_message"), Some(&FieldValue::from("Hi")));
    }
}
