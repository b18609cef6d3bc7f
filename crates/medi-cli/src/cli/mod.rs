use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `medi` binary.
#[derive(Debug, Parser)]
#[command(name = "medi", version, about = "MediFire - natural-language patient data queries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Color in table output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            color: self.color,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use medi_core::ViewKind;

    use super::root_commands::{SchemaType, ViewArg, views_or_default};
    use super::{Cli, ColorMode, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["medi", "--format", "json", "--verbose", "prompts"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Prompts));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["medi", "prompts", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn format_defaults_to_table() {
        let cli = Cli::try_parse_from(["medi", "prompts"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.global_flags().color, ColorMode::Auto);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["medi", "--format", "xml", "prompts"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn ask_joins_words_and_parses_view() {
        let cli = Cli::try_parse_from([
            "medi", "ask", "Show", "me", "patients", "--view", "gender-chart",
        ])
        .expect("cli should parse");

        let Commands::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.prompt.join(" "), "Show me patients");
        assert_eq!(args.view, Some(ViewArg::GenderChart));
    }

    #[test]
    fn ask_requires_a_prompt() {
        assert!(Cli::try_parse_from(["medi", "ask"]).is_err());
    }

    #[test]
    fn view_all_expands_to_every_view() {
        assert_eq!(ViewArg::All.kinds(), ViewKind::ALL.to_vec());
        assert_eq!(views_or_default(None, ViewKind::AgeChart), vec![ViewKind::AgeChart]);
    }

    #[test]
    fn schema_type_parses() {
        let cli = Cli::try_parse_from(["medi", "schema", "query-result"]).expect("cli should parse");
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema");
        };
        assert_eq!(args.type_name, SchemaType::QueryResult);
    }
}
