use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gtally")]
#[command(about = "Per-author contribution statistics from git commit history")]
#[command(version)]
pub struct Cli {
    #[arg(
        short = 'd',
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Only count commits from the last N days"
    )]
    pub days: Option<u32>,

    #[arg(
        short = 't',
        value_enum,
        value_name = "FORMAT",
        default_value_t = OutputFormat::Table,
        help = "Output format"
    )]
    pub format: OutputFormat,

    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::workload::exec(self.days, self.format, self.repo)
    }
}
