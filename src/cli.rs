use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sentiment-board")]
#[command(about = "News sentiment leaderboard chart and market quote snapshot tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch market quotes and refresh the JSON snapshot
    Markets {
        /// Snapshot file to write (defaults to public/markets.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the stacked sentiment leaderboard chart
    Leaderboard {
        /// Image file to write (defaults to leaderboard_with_logos.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
