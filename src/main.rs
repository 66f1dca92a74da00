//! Manus - headless client for the Manus analysis service
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use manus_client::{AnalyzeOptions, ClientOptions};
use manus_core::prelude::*;

/// Manus - upload files and have them analyzed
#[derive(Parser, Debug)]
#[command(name = "manus")]
#[command(about = "Headless client for the Manus upload-and-analysis service", long_about = None)]
struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Config file to use instead of .manus/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Expect the analysis result inline instead of polling for it
    #[arg(long, global = true)]
    sync: bool,

    /// Directory for downloads and exports
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log level for the client (trace, debug, info, warn, error); MANUS_LOG wins
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Without a subcommand, commands are read from stdin
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Upload files, run one task and wait for the result
    Analyze {
        /// Files to upload
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// What the analysis should do
        #[arg(long, short)]
        task: String,

        /// Download the session archive when done
        #[arg(long)]
        download: bool,

        /// Export the result as JSON when done
        #[arg(long)]
        export: bool,

        /// Write an HTML report to this path
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },

    /// Check that the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let options = ClientOptions {
        config: args.config,
        server: args.server,
        sync: args.sync,
        output_dir: args.output_dir,
        log_level: args.log_level,
    };

    match args.command {
        None => manus_client::run_interactive(&options).await,
        Some(CliCommand::Analyze {
            files,
            task,
            download,
            export,
            report,
        }) => {
            let analyze = AnalyzeOptions {
                files,
                task,
                download,
                export,
                report,
            };
            if let Err(e) = manus_client::run_analyze(&options, analyze).await {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        Some(CliCommand::Health) => {
            if !manus_client::run_health(&options).await? {
                eprintln!("❌ Backend is not healthy");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
