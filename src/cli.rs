use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use kindred::Strategy;

#[derive(Debug, Parser)]
#[command(
    name = "kindred",
    about = "A markdown content corpus and related-posts engine"
)]
pub struct Cli {
    /// Corpus root directory
    #[arg(long, global = true, default_value = "content")]
    pub root: PathBuf,

    /// Document file extension to scan for
    #[arg(long, global = true, default_value = "md")]
    pub ext: String,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List documents, newest first
    List(ListArgs),
    /// Print a document by slug
    Get(GetArgs),
    /// Show documents related to the one with the given slug
    Related(RelatedArgs),
    /// List all categories
    Categories(JsonArgs),
    /// List all tags
    Tags(JsonArgs),
    /// Show corpus statistics
    Status(JsonArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- List --

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only documents in this category
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Only documents carrying this tag
    #[arg(short = 't', long)]
    pub tag: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Get --

#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Document slug
    pub slug: String,

    /// Output as JSON with metadata
    #[arg(long)]
    pub json: bool,

    /// Print only metadata
    #[arg(long)]
    pub meta: bool,
}

// -- Related --

#[derive(Debug, Parser)]
pub struct RelatedArgs {
    /// Slug of the reference document
    pub slug: String,

    /// Number of related documents to return
    #[arg(short = 'n', long, default_value = "3")]
    pub count: usize,

    /// Ranking strategy
    #[arg(long, value_enum, default_value = "score")]
    pub strategy: StrategyArg,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Weighted tag + category + title similarity
    Score,
    /// Same category only
    Category,
    /// Shared-tag fraction only
    Tags,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Score => Strategy::Score,
            StrategyArg::Category => Strategy::Category,
            StrategyArg::Tags => Strategy::Tags,
        }
    }
}

// -- Shared JSON flag --

#[derive(Debug, Parser)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "kindred",
            &mut std::io::stdout(),
        );
    }
}
