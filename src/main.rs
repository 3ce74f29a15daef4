use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use reqmeter::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "reqmeter")]
#[command(about = "Server usage chart widget and endpoint diagnostics")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Probe the usage endpoint and summarize what the widget would show
    Check {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Fetch usage data and emit the rendered page as HTML
    Render {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve the rendered page on a local preview server
    Serve {
        /// Listen address, e.g. 127.0.0.1:9748 (defaults to config)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Write an annotated default config to ~/.reqmeter/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let app = App::parse();

    match app.command {
        Commands::Check { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_check(fmt)
        }
        Commands::Render { out } => cli::run_render(out),
        Commands::Serve { listen } => {
            let addr = listen.unwrap_or_else(|| config::load().serve.listen);
            web::serve(&addr)
        }
        Commands::Init { force } => cli::run_init(force),
    }
}
