use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use yt_top::commands;
use yt_top::commands::top::TopArgs;
use yt_top::config::load_env;

#[derive(Parser)]
#[command(name = "yt-top")]
#[command(about = "Find the most viewed videos of a YouTube channel within a date range")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most viewed videos published in a date range
    Top {
        /// Channel URL (e.g., https://youtube.com/@CHANNEL or .../channel/ID)
        channel: String,

        /// First day of the range, YYYY-MM-DD (default: one year ago)
        #[arg(short, long)]
        start: Option<String>,

        /// Last day of the range, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        end: Option<String>,

        /// Number of videos to show (default: 30)
        #[arg(
            short = 'n',
            long,
            default_value = "30",
            value_parser = clap::value_parser!(u64).range(1..=50)
        )]
        limit: u64,

        /// Output as JSON
        #[arg(short, long, conflicts_with = "plain")]
        json: bool,

        /// Output as a plain-text report suitable for pasting
        #[arg(short, long)]
        plain: bool,
    },

    /// Print the channel ID a channel URL resolves to
    Resolve {
        /// Channel URL
        channel: String,
    },

    /// Initialize with a YouTube Data API key
    Init {
        /// YouTube Data API key
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Save the key without checking it against the API
        #[arg(long)]
        no_verify: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    load_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Top {
            channel,
            start,
            end,
            limit,
            json,
            plain,
        } => {
            let today = Local::now().date_naive();
            let args = TopArgs {
                channel,
                start: start.unwrap_or_else(|| (today - Duration::days(365)).to_string()),
                end: end.unwrap_or_else(|| today.to_string()),
                limit: limit as usize,
                json,
                plain,
            };
            commands::top::run(args).await
        }
        Commands::Resolve { channel } => commands::resolve::run(&channel).await,
        Commands::Init {
            api_key,
            force,
            no_verify,
        } => commands::init::run(api_key, force, !no_verify).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
