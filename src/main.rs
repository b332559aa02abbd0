use anyhow::Result;
use clap::Parser;
use resumepilot::cli::commands::{AnalyzeArgs, Cli, Commands};
use resumepilot::cli::handlers::{handle_analyze_command, handle_config_command};
use resumepilot::cli::utils::{init_logging, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Execute command
    match cli.command {
        None => handle_analyze_command(AnalyzeArgs::default()).await,

        Some(Commands::Analyze(args)) => handle_analyze_command(args).await,

        Some(Commands::Config(args)) => handle_config_command(args),

        Some(Commands::Info) => {
            print_info();
            Ok(())
        }
    }
}
