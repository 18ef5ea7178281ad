//! Binary entrypoint: renders the example prompt into the working directory.
use std::path::Path;

use chatbot_prompt::example::{example_history, EXAMPLE_USER_INPUT};
use chatbot_prompt::{write_outputs, ChatbotPrompt, PromptContext};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let history = example_history()?;
    let prompt = ChatbotPrompt::new(
        EXAMPLE_USER_INPUT,
        Some(history.as_slice()),
        &PromptContext::now(),
    )?;

    let reports = write_outputs(&prompt, Path::new("."));
    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} outputs failed", failed, reports.len());
    }
    Ok(())
}
