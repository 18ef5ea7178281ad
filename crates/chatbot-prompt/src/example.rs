//! Literal inputs for the bundled example run.
use chrono::{NaiveDate, NaiveDateTime};
use spof_core::{ChatMessage, ValidationError};

pub const EXAMPLE_USER_INPUT: &str = "Hi! Can you help me plan a weekend trip to Paris?";

fn at(hour: u32, min: u32, sec: u32) -> Result<NaiveDateTime, ValidationError> {
    NaiveDate::from_ymd_opt(2025, 9, 6)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .ok_or_else(|| ValidationError::Malformed(format!("invalid time {hour}:{min}:{sec}")))
}

/// The four-message conversation that precedes the example turn
pub fn example_history() -> Result<Vec<ChatMessage>, ValidationError> {
    Ok(vec![
        ChatMessage::parse("User", at(14, 30, 0)?, "Hello there!")?,
        ChatMessage::parse(
            "Assistant",
            at(14, 30, 5)?,
            "Hi! I'm Alex, your helpful assistant. How can I help you today?",
        )?,
        ChatMessage::parse("User", at(14, 31, 0)?, "I'm looking for travel advice")?,
        ChatMessage::parse(
            "Assistant",
            at(14, 31, 3)?,
            "I'd love to help with travel planning! What destination are you considering?",
        )?,
    ])
}
