use std::fmt::Write as _;

use anyhow::Context;
use medi_config::MediConfig;
use medi_core::{ResponseBody, ViewKind};
use medi_view::project_body;

use crate::cli::root_commands::{RenderArgs, views_or_default};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::{ViewReport, view_options};
use crate::output::render;
use crate::output::views::render_model;

/// Handle `medi render`.
pub fn handle(args: &RenderArgs, config: &MediConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let views = views_or_default(args.view, config.general.default_view);
    println!("{}", render_document(&text, &views, flags.format)?);
    Ok(())
}

fn render_document(text: &str, views: &[ViewKind], format: OutputFormat) -> anyhow::Result<String> {
    let body = ResponseBody::from_response(Some(text));
    if let ResponseBody::Malformed { reason, .. } = &body {
        tracing::warn!(%reason, "response document is not a patient payload");
    }

    let reports = views
        .iter()
        .map(|view| ViewReport {
            view: *view,
            model: project_body(&body, *view),
        })
        .collect::<Vec<_>>();

    match format {
        OutputFormat::Json | OutputFormat::Raw => render(&reports, format),
        OutputFormat::Table => {
            let options = view_options();
            let mut out = String::new();
            for report in &reports {
                let _ = writeln!(out, "── {} ──", report.view.title());
                let _ = writeln!(out, "{}", render_model(&report.model, options));
            }
            Ok(out.trim_end().to_string())
        }
    }
}
