use medi_suggest::corpus::QUICK_PROMPTS;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct QuickPromptRow {
    index: usize,
    title: &'static str,
    prompt: &'static str,
}

fn rows() -> Vec<QuickPromptRow> {
    QUICK_PROMPTS
        .iter()
        .enumerate()
        .map(|(index, &(title, prompt))| QuickPromptRow {
            index: index + 1,
            title,
            prompt,
        })
        .collect()
}

/// Handle `medi prompts`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&rows(), flags.format)
}
