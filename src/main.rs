mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_analyze, run_config, run_contrast};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    match args.command {
        Commands::Analyze {
            source,
            output,
            format,
            timeout,
            max_stylesheets,
            no_external_css,
            user_agent,
            quiet,
        } => {
            run_analyze(
                &raw_args,
                args.config,
                args.verbose,
                source,
                output,
                format,
                timeout,
                max_stylesheets,
                no_external_css,
                user_agent,
                quiet,
            )
            .await
        }
        Commands::Contrast {
            foreground,
            background,
            min_ratio,
            format,
        } => run_contrast(args.verbose, foreground, background, min_ratio, format).await,
        Commands::Config => run_config(args.config).await,
    }
}
