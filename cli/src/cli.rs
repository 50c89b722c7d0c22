//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "api-governor",
    version,
    about = "Govern OpenAPI/Swagger specs with the API Governor analyzer",
    long_about = "Runs the external API Governor analyzer against OpenAPI and Swagger documents and reports its findings.\n\nConfiguration precedence: API_GOVERNOR_* environment > config file > defaults.",
    after_help = "Examples:\n  api-governor lint api/openapi.yaml\n  api-governor diff api/openapi.yaml --baseline api/v1/openapi.yaml\n  api-governor report api/openapi.yaml --workspace . --open\n  api-governor watch api/*.openapi.yaml",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: ~/.api-governor/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Lint documents and print their diagnostics
    #[command(
        long_about = "Lint each document concurrently. Exits non-zero when any document has blockers or the analyzer fails."
    )]
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, help = "Print diagnostics as JSON")]
        json: bool,
    },
    /// Compare a document against a baseline for breaking changes
    #[command(
        long_about = "Baseline precedence: --baseline > configured baseline_spec > interactive prompt. Exits non-zero when breaking changes are found."
    )]
    Diff {
        file: PathBuf,
        #[arg(long, value_name = "PATH")]
        baseline: Option<PathBuf>,
    },
    /// Generate a persisted API_REVIEW.md report
    Report {
        file: PathBuf,
        #[arg(long, help = "Print the generated report")]
        open: bool,
        #[arg(
            long,
            value_name = "DIR",
            help = "Workspace root; the report goes to <DIR>/.api-governor (default: next to the document)"
        )]
        workspace: Option<PathBuf>,
    },
    /// Lint on open, then re-lint whenever a file is saved
    Watch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}
