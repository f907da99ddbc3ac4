use crate::commands;
use bidprep::error::AppError;
use bidprep::scoring::IndustryKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bidprep",
    about = "Look up registered companies and compute bid management scores",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count extracted companies per sheet
    Stats(RegistryArgs),
    /// Verify the configured workbook path and report what it loads
    Check(RegistryArgs),
    /// Search companies by (partial) name
    Search(SearchArgs),
    /// Compute the management score of a company for an agency and amount
    Score(ScoreArgs),
    /// Write every extracted company to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct RegistryArgs {
    /// Override the configured company workbook (.xlsx)
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
    /// Override the configured settings file
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Company name or fragment; corporate forms are ignored
    pub(crate) query: String,
    /// Maximum number of matches to print
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
    #[command(flatten)]
    pub(crate) registry: RegistryArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Company name or fragment; the first match is scored
    #[arg(long)]
    pub(crate) company: String,
    /// Agency id as declared in the rule document (e.g. MOIS)
    #[arg(long)]
    pub(crate) agency: String,
    /// Contract amount; thousands separators are accepted
    #[arg(long)]
    pub(crate) amount: String,
    /// Work category: eung/전기, tongsin/통신 or sobang/소방
    #[arg(long)]
    pub(crate) industry: IndustryKind,
    /// Override the configured rule document
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the full assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) registry: RegistryArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination CSV file
    #[arg(long)]
    pub(crate) out: PathBuf,
    #[command(flatten)]
    pub(crate) registry: RegistryArgs,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Stats(args) => commands::stats(args),
        Command::Check(args) => commands::check(args),
        Command::Search(args) => commands::search(args),
        Command::Score(args) => commands::score(args),
        Command::Export(args) => commands::export(args),
    }
}
