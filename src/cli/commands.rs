use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "planfeed")]
#[command(about = "Atom/GeoRSS feed of recently shared DistrictBuilder plans")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the feed of recently shared plans
    Render {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum number of plans (defaults to FEED_MAX_PLANS)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List recently shared plans
    List {
        /// Maximum number of plans (defaults to FEED_MAX_PLANS)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Import plans from a JSON file
    Import {
        /// Path to a JSON array of plan records
        path: String,
    },

    /// Validate the feed configuration and print it
    CheckConfig,
}
