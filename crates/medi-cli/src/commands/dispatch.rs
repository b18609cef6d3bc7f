use medi_config::MediConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, config: &MediConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Ask(args) => commands::ask::handle(&args, config, flags).await,
        Commands::Chat(args) => commands::chat::handle(&args, config, flags).await,
        Commands::Suggest(args) => commands::suggest::handle(&args, config, flags),
        Commands::Render(args) => commands::render::handle(&args, config, flags),
        Commands::Prompts => commands::prompts::handle(flags),
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
