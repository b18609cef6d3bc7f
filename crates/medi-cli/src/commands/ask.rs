use std::sync::Arc;

use anyhow::{Context, bail};
use medi_client::HttpQueryClient;
use medi_config::MediConfig;
use medi_core::GenerationStatus;
use medi_session::SessionController;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AskArgs, views_or_default};
use crate::commands::shared::{format_generation, session_options};
use crate::progress::Progress;

/// Handle `medi ask`.
pub async fn handle(args: &AskArgs, config: &MediConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let prompt = args.prompt.join(" ");
    let client = Arc::new(HttpQueryClient::new(&config.backend));
    tracing::debug!(endpoint = client.endpoint(), "ask");

    let mut session = SessionController::new(client, session_options(config));
    let id = session
        .submit_prompt(&prompt)
        .context("prompt is empty after trimming")?;

    let progress = Progress::spinner("Generating response...");
    if let Err(error) = session.run_until_idle().await {
        progress.finish_err("failed");
        return Err(error.into());
    }

    let generation = session
        .generation(id)
        .with_context(|| format!("{id} disappeared from the session"))?;

    if generation.status() == GenerationStatus::Error {
        progress.finish_err("query failed");
        bail!(
            "{}",
            generation
                .error_message()
                .unwrap_or("Failed to generate response")
        );
    }
    progress.finish_clear();

    let views = views_or_default(args.view, config.general.default_view);
    println!("{}", format_generation(generation, &views, flags)?);
    Ok(())
}
