use std::fmt::Write as _;

use medi_config::MediConfig;
use medi_suggest::{FilterOptions, SuggestionIndex};
use serde::Serialize;

use crate::cli::root_commands::SuggestArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::filter_options;
use crate::output::render;

#[derive(Debug, Serialize)]
struct SuggestResponse {
    query: String,
    matches: Vec<String>,
    /// Whether the dropdown would be drawn for this many matches.
    shown: bool,
}

/// Handle `medi suggest`.
pub fn handle(args: &SuggestArgs, config: &MediConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = suggest(&args.text.join(" "), filter_options(config));
    let rendered = match flags.format {
        OutputFormat::Table => format_matches(&response),
        OutputFormat::Json | OutputFormat::Raw => render(&response, flags.format)?,
    };
    println!("{rendered}");
    Ok(())
}

fn suggest(query: &str, options: FilterOptions) -> SuggestResponse {
    let matches = SuggestionIndex::builtin()
        .filter(query, options)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let shown = matches.len() >= options.min_display_matches.max(1);
    SuggestResponse {
        query: query.to_string(),
        matches,
        shown,
    }
}

fn format_matches(response: &SuggestResponse) -> String {
    if response.matches.is_empty() {
        return String::from("(no suggestions)");
    }
    let mut out = String::new();
    for (index, phrase) in response.matches.iter().enumerate() {
        let _ = writeln!(out, "{}. {phrase}", index + 1);
    }
    if !response.shown {
        out.push_str("(single match; the dropdown stays hidden but Enter accepts it)");
    }
    out.trim_end().to_string()
}
