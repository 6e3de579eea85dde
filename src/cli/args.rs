use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::directory::PageSize;

#[derive(Parser, Debug)]
#[command(name = "dataguru")]
#[command(version)]
#[command(about = "Staff directory dashboard for SK Klang Gate", long_about = None)]
pub struct Cli {
    /// Published CSV URL of the staff sheet
    #[arg(short, long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Read the staff sheet from a local CSV file instead
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Rows per page: 10, 20, 50, 100 or "all"
    #[arg(long)]
    pub page_size: Option<PageSize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Tui,
    /// Print one page of the filtered staff table
    List(ListArgs),
    /// Print grade and specialization counts
    Stats(StatsArgs),
    /// Print the grade and specialization filter options
    Options {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the "Tambah Guru" form link
    Form,
    /// Initialize configuration
    Init,
    /// Show configuration and probe the data source
    Status,
    /// Show version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive substring of the teacher's name
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact grade, e.g. DG44
    #[arg(short, long)]
    pub grade: Option<String>,

    /// Exact specialization
    #[arg(long)]
    pub specialization: Option<String>,

    /// 1-based page number, clamped to the last page
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Restrict the specialization chart to one grade
    #[arg(short, long)]
    pub grade: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["dataguru"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.page_size.is_none());
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "dataguru",
            "--file",
            "guru.csv",
            "--page-size",
            "all",
            "list",
            "--grade",
            "DG44",
            "--page",
            "3",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("guru.csv")));
        assert_eq!(cli.page_size, Some(PageSize::All));
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.grade.as_deref(), Some("DG44"));
                assert_eq!(args.page, 3);
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.search.is_empty());
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result = Cli::try_parse_from([
            "dataguru",
            "--url",
            "https://example.org/sheet.csv",
            "--file",
            "guru.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_page_size_rejected() {
        assert!(Cli::try_parse_from(["dataguru", "--page-size", "0"]).is_err());
    }
}
