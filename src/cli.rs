use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "finlist")]
#[command(about = "Terminal client for the FinList financial newsletter")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive trending-tickers dashboard (default)
    Dashboard,

    /// Fetch quotes once and print them to stdout
    Quotes {
        /// Ticker symbols to fetch (defaults to the dashboard set)
        symbols: Vec<String>,
    },

    /// Fetch an article by slug and print it
    Article {
        /// Slug as served by the backend index
        slug: String,
    },

    /// Subscribe an email address to sector updates
    Subscribe {
        #[arg(short, long)]
        email: String,

        /// Sector id, repeatable (tech, finance, health, energy, consumer, real-estate)
        #[arg(short, long = "sector")]
        sectors: Vec<String>,
    },
}
