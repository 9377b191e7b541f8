pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "mockgen")]
#[command(about = "Mockdup CLI - generate mock records and manage the metadata database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate mock records from field definitions")]
    Generate(commands::generate::GenerateArgs),

    #[command(about = "List the supported field types")]
    Types,

    #[command(about = "Create the metadata tables in DATABASE_URL")]
    InitDb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Generate(args) => commands::generate::handle(args, output_format),
        Commands::Types => commands::types::handle(output_format),
        Commands::InitDb => commands::db::init(output_format).await,
    }
}
