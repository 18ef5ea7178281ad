//! Writing rendered prompts to disk, one file per format.
use std::path::{Path, PathBuf};

use spof_render::{Format, RenderError};
use thiserror::Error;

use crate::prompt::ChatbotPrompt;

/// File stem shared by all outputs: `chatbot.xml`, `chatbot.md`, `chatbot.json`
pub const OUTPUT_STEM: &str = "chatbot";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Write failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of writing one format
#[derive(Debug)]
pub struct OutputReport {
    pub format: Format,
    pub path: PathBuf,
    pub result: Result<usize, OutputError>,
}

impl OutputReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub fn output_path(dir: &Path, format: Format) -> PathBuf {
    dir.join(format!("{}.{}", OUTPUT_STEM, format.extension()))
}

/// Render and write every format into `dir`, overwriting existing files.
///
/// Each format is attempted even when an earlier one failed.
pub fn write_outputs(prompt: &ChatbotPrompt, dir: &Path) -> Vec<OutputReport> {
    Format::ALL
        .iter()
        .map(|&format| {
            let path = output_path(dir, format);
            let result = write_one(prompt, format, &path);
            match &result {
                Ok(bytes) => tracing::info!(path = %path.display(), bytes, "wrote prompt"),
                Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to write prompt"),
            }
            OutputReport {
                format,
                path,
                result,
            }
        })
        .collect()
}

fn write_one(prompt: &ChatbotPrompt, format: Format, path: &Path) -> Result<usize, OutputError> {
    let rendered = prompt.render(format)?;
    std::fs::write(path, &rendered).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rendered.len())
}
