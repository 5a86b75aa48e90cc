use clap::Parser;
use env_logger::Env;
use log::warn;

use sentiment_board::chart;
use sentiment_board::cli::{Cli, Commands};
use sentiment_board::config::{LeaderboardConfig, MarketsConfig};
use sentiment_board::fetch::YahooQuoteSource;
use sentiment_board::markets;

// Degraded runs still exit 0; failures only surface as log warnings so a
// cron invocation never trips on a provider outage.
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Markets { output } => {
            let mut config = MarketsConfig::builtin();
            if let Some(path) = output {
                config.snapshot_path = path;
            }
            let source = YahooQuoteSource::new();
            if let Err(err) = markets::run(&config, &source).await {
                warn!("markets update failed: {err}");
            }
        }
        Commands::Leaderboard { output } => {
            let mut config = LeaderboardConfig::builtin();
            if let Some(path) = output {
                config.output_path = path;
            }
            if let Err(err) = chart::render_leaderboard(&config) {
                warn!("leaderboard render failed: {err}");
            }
        }
    }
}
