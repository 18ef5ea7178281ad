//! End-to-end tests for the chatbot prompt.
//!
//! These compose the bundled example turn and check all three rendered
//! documents, plus the files written for them.

use chatbot_prompt::example::{example_history, EXAMPLE_USER_INPUT};
use chatbot_prompt::{
    output_path, write_outputs, ChatbotPrompt, OutputError, PromptContext, FINAL_INSTRUCTION,
};
use chrono::NaiveDate;
use serde_json::Value;
use spof_core::{ChatMessage, Sender};
use spof_render::{parse_data, parse_markup, FieldNode, Format};

fn ctx() -> PromptContext {
    PromptContext::new(
        NaiveDate::from_ymd_opt(2025, 9, 6)
            .unwrap()
            .and_hms_opt(14, 32, 0)
            .unwrap(),
    )
}

fn example_prompt() -> ChatbotPrompt {
    let history = example_history().unwrap();
    ChatbotPrompt::new(EXAMPLE_USER_INPUT, Some(history.as_slice()), &ctx()).unwrap()
}

/// Text between a `## heading` line and the next heading of the same level
fn section<'a>(doc: &'a str, heading: &str) -> &'a str {
    let marker = format!("## {}\n", heading);
    let start = doc
        .find(&marker)
        .unwrap_or_else(|| panic!("no section {heading:?} in:\n{doc}"))
        + marker.len();
    let rest = &doc[start..];
    match rest.find("\n## ") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

// =============================================================================
// Example scenario
// =============================================================================

#[test]
fn test_sections_for_example_turn() {
    let md = example_prompt().to_sections().unwrap();

    assert!(section(&md, "personality").contains("Alex"));

    let history = section(&md, "conversation_history");
    assert!(history.starts_with("\n### messages\n\n#### chat_message\n"));
    assert_eq!(history.matches("#### chat_message").count(), 4);
    let order = [
        "Hello there!",
        "Hi! I'm Alex, your helpful assistant.",
        "I'm looking for travel advice",
        "What destination are you considering?",
    ];
    let positions: Vec<usize> = order.iter().map(|m| history.find(m).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // the count belongs to the history, not to the last message under it
    let last_message = &history[history.rfind("#### chat_message").unwrap()..];
    let last_message = &last_message[..last_message.find("\n### ").unwrap()];
    assert!(last_message.contains("What destination are you considering?"));
    assert!(!last_message.contains("total_messages"));
    assert!(history.contains("\n### total_messages\n\n4\n"));

    let task = section(&md, "task");
    assert_eq!(task.trim(), FINAL_INSTRUCTION);
    assert!(md.trim_end().ends_with(FINAL_INSTRUCTION));
}

#[test]
fn test_data_for_example_turn() {
    let json: Value = serde_json::from_str(&example_prompt().to_data().unwrap()).unwrap();
    let root = &json["chatbot_prompt"];

    let messages = root["conversation_history"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(root["conversation_history"]["total_messages"], 4);
    assert_eq!(messages[0]["sender"], "User");
    assert_eq!(messages[0]["timestamp"], "2025-09-06 14:30:00");
    assert_eq!(messages[3]["sender"], "Assistant");

    assert_eq!(root["current_context"]["timestamp"], "2025-09-06 14:32:00");
    assert_eq!(root["current_context"]["user_message"], EXAMPLE_USER_INPUT);
    assert_eq!(root["current_context"]["session_info"], "New conversation session");
    assert_eq!(root["directions"]["guidelines"][2], "Acknowledge when you don't know something");

    let keys: Vec<&str> = root.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["role", "personality", "directions", "conversation_history", "current_context", "task"]
    );
}

#[test]
fn test_markup_for_example_turn() {
    let xml = example_prompt().to_markup().unwrap();
    assert!(xml.starts_with("<chatbot_prompt>\n  <role>You are Alex, a helpful AI assistant."));
    assert!(xml.contains("<safety>\n      <item>Never provide harmful or dangerous advice</item>"));
    assert!(xml.contains(
        "<communication_style>Conversational, clear, and empathetic. \
         Use 'I' naturally when speaking.</communication_style>"
    ));
    assert_eq!(xml.matches("<chat_message>").count(), 4);
}

#[test]
fn test_markup_and_data_agree() {
    let prompt = example_prompt();
    let from_markup = parse_markup(&prompt.to_markup().unwrap()).unwrap();
    let from_data = parse_data(&prompt.to_data().unwrap()).unwrap();
    assert_eq!(from_markup, from_data);

    let messages = from_markup
        .lookup("conversation_history.messages")
        .and_then(FieldNode::as_list)
        .unwrap();
    assert_eq!(messages.len(), 4);
}

// =============================================================================
// Omission scenario
// =============================================================================

#[test]
fn test_no_history_leaves_no_trace() {
    let prompt = ChatbotPrompt::new("hello", None, &ctx()).unwrap();
    for format in Format::ALL {
        let out = prompt.render(format).unwrap();
        assert!(
            !out.contains("conversation_history"),
            "{format:?} output mentions history:\n{out}"
        );
        assert!(!out.contains("chat_message"));
    }
}

// =============================================================================
// History window
// =============================================================================

#[test]
fn test_long_history_is_truncated() {
    let start = NaiveDate::from_ymd_opt(2025, 9, 6)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let history: Vec<ChatMessage> = (0..25)
        .map(|i| {
            ChatMessage::new(
                if i % 2 == 0 { Sender::User } else { Sender::Assistant },
                start + chrono::Duration::seconds(i),
                format!("turn {}", i),
            )
        })
        .collect();

    let prompt = ChatbotPrompt::new("next", Some(history.as_slice()), &ctx()).unwrap();
    let json: Value = serde_json::from_str(&prompt.to_data().unwrap()).unwrap();
    let block = &json["chatbot_prompt"]["conversation_history"];
    let contents: Vec<&str> = block["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();

    let expected: Vec<String> = (15..25).map(|i| format!("turn {}", i)).collect();
    assert_eq!(contents, expected);
    assert_eq!(block["total_messages"], 25);

    let narrow_ctx = ctx().with_history_limit(3);
    let narrow = ChatbotPrompt::new("next", Some(history.as_slice()), &narrow_ctx).unwrap();
    let md = narrow.to_sections().unwrap();
    assert_eq!(md.matches("#### chat_message").count(), 3);
}

// =============================================================================
// Output files
// =============================================================================

#[test]
fn test_write_outputs_creates_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let prompt = example_prompt();

    let reports = write_outputs(&prompt, dir.path());
    assert!(reports.iter().all(|r| r.is_ok()));

    let names: Vec<String> = reports
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["chatbot.xml", "chatbot.md", "chatbot.json"]);

    let md = std::fs::read_to_string(output_path(dir.path(), Format::Sections)).unwrap();
    assert_eq!(md, prompt.to_sections().unwrap());
}

#[test]
fn test_write_outputs_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = output_path(dir.path(), Format::Data);
    std::fs::write(&json_path, "stale").unwrap();

    write_outputs(&example_prompt(), dir.path());
    let json = std::fs::read_to_string(&json_path).unwrap();
    assert!(json.starts_with('{'));
}

#[test]
fn test_one_failed_write_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the markdown file should go makes that write fail
    std::fs::create_dir(output_path(dir.path(), Format::Sections)).unwrap();

    let reports = write_outputs(&example_prompt(), dir.path());
    let outcome: Vec<(Format, bool)> = reports.iter().map(|r| (r.format, r.is_ok())).collect();
    assert_eq!(
        outcome,
        vec![(Format::Markup, true), (Format::Sections, false), (Format::Data, true)]
    );
    assert!(matches!(reports[1].result, Err(OutputError::Io { .. })));
    assert!(output_path(dir.path(), Format::Data).is_file());
}
