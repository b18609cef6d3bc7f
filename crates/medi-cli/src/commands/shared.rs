use medi_config::MediConfig;
use medi_core::{Generation, ViewKind};
use medi_session::SessionOptions;
use medi_suggest::FilterOptions;
use medi_view::{RenderModel, project_body};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::views::{ViewOptions, render_generation};
use crate::output::{render, table_options};
use crate::ui;

#[must_use]
pub const fn filter_options(config: &MediConfig) -> FilterOptions {
    FilterOptions {
        min_query_chars: config.suggestions.min_query_chars,
        max_matches: config.suggestions.max_matches,
        min_display_matches: config.suggestions.min_display_matches,
    }
}

#[must_use]
pub const fn session_options(config: &MediConfig) -> SessionOptions {
    SessionOptions {
        policy: config.session.policy,
        max_prompt_chars: config.session.max_prompt_chars,
        filter: filter_options(config),
    }
}

#[must_use]
pub fn view_options() -> ViewOptions {
    ViewOptions {
        table: table_options(),
        bar_width: ui::prefs().bar_width,
    }
}

/// One projected view, for JSON output.
#[derive(Debug, Serialize)]
pub struct ViewReport {
    pub view: ViewKind,
    pub model: RenderModel,
}

/// A generation plus the requested projections of its response.
#[derive(Debug, Serialize)]
pub struct GenerationReport<'a> {
    pub generation: &'a Generation,
    pub views: Vec<ViewReport>,
}

impl<'a> GenerationReport<'a> {
    #[must_use]
    pub fn new(generation: &'a Generation, views: &[ViewKind]) -> Self {
        let views = generation
            .response()
            .map(|body| {
                views
                    .iter()
                    .map(|view| ViewReport {
                        view: *view,
                        model: project_body(body, *view),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Self { generation, views }
    }
}

/// Render a generation in the requested output format.
pub fn format_generation(
    generation: &Generation,
    views: &[ViewKind],
    flags: &GlobalFlags,
) -> anyhow::Result<String> {
    match flags.format {
        OutputFormat::Table => Ok(render_generation(generation, views, view_options())),
        OutputFormat::Json | OutputFormat::Raw => {
            render(&GenerationReport::new(generation, views), flags.format)
        }
    }
}
