use std::fs;
use std::io::{self, BufWriter};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planfeed::cli::{Cli, Commands};
use planfeed::config::{Config, FeedConfig};
use planfeed::errors::PlanFeedResult;
use planfeed::render::{FeedRenderer, SiteRoutes, SystemClock};
use planfeed::services::{FeedService, ImportService};
use planfeed::storage::sqlite::{SqlitePlanRepository, SqliteStorage};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> PlanFeedResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Render { output, limit } => {
            // Map server settings are checked before the database is opened
            let feed = FeedConfig::from_env()?;
            cmd_render(
                open_repository(&config)?,
                &config,
                &feed,
                output,
                limit.unwrap_or(config.max_plans),
            )
        }
        Commands::List { limit } => cmd_list(
            open_repository(&config)?,
            limit.unwrap_or(config.max_plans),
        ),
        Commands::Import { path } => cmd_import(&path, open_repository(&config)?),
        Commands::CheckConfig => cmd_check_config(&config, &FeedConfig::from_env()?),
    }
}

fn open_repository(config: &Config) -> PlanFeedResult<SqlitePlanRepository> {
    let storage = SqliteStorage::new(&config.db_path)?;
    Ok(SqlitePlanRepository::new(storage))
}

fn cmd_render(
    plan_repo: SqlitePlanRepository,
    config: &Config,
    feed: &FeedConfig,
    output: Option<String>,
    limit: usize,
) -> PlanFeedResult<()> {
    let routes = SiteRoutes::new(config.base_url.clone())?;
    let renderer = FeedRenderer::new(feed, routes, SystemClock)?;
    let service = FeedService::new(plan_repo);

    match output {
        Some(path) => {
            // Render fully before touching the file so a failure leaves no partial feed
            let mut buf = Vec::new();
            let count = service.write_feed(&renderer, limit, &mut buf)?;
            fs::write(&path, &buf)?;
            println!("Wrote {} plans to {}", count, path);
        }
        None => {
            let stdout = io::stdout();
            service.write_feed(&renderer, limit, BufWriter::new(stdout.lock()))?;
        }
    }

    Ok(())
}

fn cmd_list(plan_repo: SqlitePlanRepository, limit: usize) -> PlanFeedResult<()> {
    let service = FeedService::new(plan_repo);
    let plans = service.recent_plans(limit)?;

    if plans.is_empty() {
        println!("No shared plans.");
        return Ok(());
    }

    println!("Recently shared plans:\n");
    for plan in plans {
        let geometry = match &plan.last_changed_district {
            Some(district) if district.usable_centroid().is_some() => {
                format!("district {}", district.id)
            }
            Some(district) => format!("district {}, no centroid", district.id),
            None => "no district".to_string(),
        };
        println!(
            "  {}. {} (edited {}) [{}]",
            plan.id,
            plan.name,
            plan.edited.to_rfc3339(),
            geometry
        );
    }

    Ok(())
}

fn cmd_import(path: &str, plan_repo: SqlitePlanRepository) -> PlanFeedResult<()> {
    let content = fs::read_to_string(path)?;
    let service = ImportService::new(plan_repo);

    println!("Importing plans from {}...\n", path);

    let result = service.import_json(&content)?;

    if !result.imported.is_empty() {
        println!("Imported {} plans:", result.imported.len());
        for plan in &result.imported {
            let shared = if plan.is_shared { "shared" } else { "private" };
            println!("  + {} [{}]", plan.name, shared);
        }
        println!();
    }

    if !result.invalid.is_empty() {
        println!("Failed {} records:", result.invalid.len());
        for (index, error) in &result.invalid {
            println!("  ! record {}: {}", index, error);
        }
        println!();
    }

    println!(
        "Import complete: {} imported, {} failed",
        result.imported.len(),
        result.invalid.len()
    );

    Ok(())
}

fn cmd_check_config(config: &Config, feed: &FeedConfig) -> PlanFeedResult<()> {

    println!("Configuration OK\n");
    println!("  Database: {}", config.db_path);
    println!("  Base URL: {}", config.base_url);
    println!("  Max plans: {}", config.max_plans);
    println!("  Feed:");
    println!("{}", serde_json::to_string_pretty(feed)?);
    Ok(())
}
