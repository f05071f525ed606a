use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "psa")]
#[command(
    version,
    about = "Page Style Audit - Extract and classify webpage colors and typography",
    long_about = "Page Style Audit (PSA)\n\nModes:\n- analyze: extract and classify colors, fonts, and CSS variables from a webpage or local HTML file.\n- contrast: check the WCAG contrast ratio between two colors.\n- config: print the effective configuration as TOML.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for fetch timeouts and keyword lists; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the colors and typography of a webpage or local HTML file
    Analyze {
        #[arg(
            value_name = "SOURCE",
            help = "Page URL or local HTML file; bare domains are fetched over https"
        )]
        source: String,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(
            long,
            short = 't',
            default_value = "10",
            help = "Request timeout (seconds) for fetching the page and stylesheets"
        )]
        timeout: u64,

        #[arg(
            long,
            default_value = "20",
            help = "Maximum number of same-origin stylesheets to fetch"
        )]
        max_stylesheets: usize,

        #[arg(long, help = "Skip fetching external stylesheets")]
        no_external_css: bool,

        #[arg(long, value_name = "STRING", help = "User-Agent header for requests")]
        user_agent: Option<String>,

        #[arg(long, help = "Suppress stdout output (useful with --output)")]
        quiet: bool,
    },

    /// Check the WCAG contrast ratio between two colors
    Contrast {
        #[arg(
            value_name = "FOREGROUND",
            help = "Foreground color (hex, rgb()/rgba(), hsl()/hsla(), or named)"
        )]
        foreground: String,

        #[arg(
            value_name = "BACKGROUND",
            help = "Background color (hex, rgb()/rgba(), hsl()/hsla(), or named)"
        )]
        background: String,

        #[arg(
            long,
            value_name = "RATIO",
            help = "Fail (exit 1) when the ratio is below this threshold (e.g. 4.5)"
        )]
        min_ratio: Option<f64>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
