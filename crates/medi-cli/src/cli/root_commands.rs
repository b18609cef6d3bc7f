use clap::{Args, Subcommand, ValueEnum};
use medi_core::ViewKind;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Ask one question and print the result.
    Ask(AskArgs),
    /// Interactive conversation with live suggestions.
    Chat(ChatArgs),
    /// Show autocomplete suggestions for partial input.
    Suggest(SuggestArgs),
    /// Render a saved response document without contacting the backend.
    Render(RenderArgs),
    /// List the starter prompts.
    Prompts,
    /// Print the JSON Schema of a contract type.
    Schema(SchemaArgs),
}

/// View selection on the command line; `all` expands to every view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ViewArg {
    Table,
    Statistics,
    GenderChart,
    AgeChart,
    All,
}

impl ViewArg {
    #[must_use]
    pub fn kinds(self) -> Vec<ViewKind> {
        match self {
            Self::Table => vec![ViewKind::Table],
            Self::Statistics => vec![ViewKind::Statistics],
            Self::GenderChart => vec![ViewKind::GenderChart],
            Self::AgeChart => vec![ViewKind::AgeChart],
            Self::All => ViewKind::ALL.to_vec(),
        }
    }
}

/// Resolve an optional `--view` against the configured default.
#[must_use]
pub fn views_or_default(view: Option<ViewArg>, default: ViewKind) -> Vec<ViewKind> {
    view.map_or_else(|| vec![default], ViewArg::kinds)
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// The question, e.g. "Find all patients with diabetes who are males".
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,

    /// View(s) to render; defaults to `general.default_view`.
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,
}

#[derive(Clone, Debug, Args)]
pub struct ChatArgs {
    /// Allow new prompts while earlier ones are still pending.
    #[arg(long)]
    pub concurrent: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SuggestArgs {
    /// Partial input to complete.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    /// Path to a JSON response document (bare payload or `{"results": ...}`).
    pub file: std::path::PathBuf,

    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    QueryResult,
    Payload,
    Generation,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Contract type to describe.
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
