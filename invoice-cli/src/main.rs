mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "invoicer", version, about = "Invoice totals, previews and PDF export")]
struct Cli {
    /// Config file (defaults to ./invoicer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print subtotal, discount, tax and total for a draft
    Totals {
        draft: PathBuf,
        /// Print the draft and totals as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a draft as a vector PDF preview
    Preview {
        draft: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Paginate a captured preview image into invoice_<millis>.pdf
    Export {
        capture: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show the version and page count of a PDF
    Inspect { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("cannot load configuration")?;
    logging::init_tracing(&config.log_level);

    match cli.command {
        Commands::Totals { draft, json } => commands::totals(&draft, json, &config),
        Commands::Preview { draft, output } => {
            commands::preview(&draft, output, &config).map(|_| ())
        }
        Commands::Export { capture, out_dir } => {
            commands::export(&capture, out_dir, &config).await.map(|_| ())
        }
        Commands::Inspect { file } => commands::inspect(&file),
    }
}
