mod ai;
mod cli;
mod config;
mod error;
mod github;
mod orchestrator;
mod report;
mod subscriptions;

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use cli::{Cli, Commands, SubscriptionCommand};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use orchestrator::Orchestrator;
use report::summary::ReportGenerator;
use report::window::ReportWindow;
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Init { force }) => init_config(force),
        Some(Commands::Config) => {
            let config = load_config(cli.config.as_deref())?;
            println!("Current configuration:\n");
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Commands::ClearCache) => clear_cache(&load_config(cli.config.as_deref())?),
        Some(Commands::CacheStats) => cache_stats(&load_config(cli.config.as_deref())?),
        Some(Commands::Subscriptions(command)) => {
            let config = load_config(cli.config.as_deref())?;
            let mut orchestrator = Orchestrator::new(config)?;
            handle_subscriptions(&mut orchestrator, command)
        }
        Some(Commands::Export(range)) => {
            let config = load_config(cli.config.as_deref())?;
            let window = range.window(config.default_period_days)?;
            let orchestrator = Orchestrator::new(config)?;

            let spinner = spinner(format!("Fetching activity for {}...", range.repo));
            let raw_path = orchestrator.export_raw(&range.repo, &window).await;
            spinner.finish_and_clear();

            let raw_path = raw_path.context("Failed to export progress")?;
            println!("✓ Raw progress written to: {}", raw_path.display());
            Ok(())
        }
        Some(Commands::Report { range, no_cache }) => {
            let config = load_config(cli.config.as_deref())?;
            let window = range.window(config.default_period_days)?;
            run_report(config, &range.repo, &window, !no_cache).await
        }
        None => {
            let config = load_config(cli.config.as_deref())?;
            run_interactive(config).await
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, raised by each `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repo_sentinel={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_create_default()?,
    };
    Ok(config)
}

async fn run_report(
    config: Config,
    repo: &str,
    window: &ReportWindow,
    use_cache: bool,
) -> anyhow::Result<()> {
    let generator = match ReportGenerator::from_config(&config, use_cache) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\nTo authenticate with Claude, either:");
            eprintln!("  1. Set the ANTHROPIC_AUTH_TOKEN environment variable");
            eprintln!("  2. Add claude_api_key to your config file at: {}",
                Config::default_config_path()?.display());
            std::process::exit(1);
        }
    };
    let orchestrator = Orchestrator::new(config)?;

    let spinner = spinner(format!("Building progress report for {}...", repo));
    let result = orchestrator.export_progress(repo, window, &generator).await;
    spinner.finish_and_clear();

    let (report, report_path, raw_path) = result.context("Failed to generate report")?;

    println!("\n{}\n", "=".repeat(60));
    println!("{}", report);
    println!("{}", "-".repeat(60));
    println!("Raw progress: {}", raw_path.display());
    println!("Report:       {}", report_path.display());
    Ok(())
}

async fn run_interactive(config: Config) -> anyhow::Result<()> {
    println!("repo-sentinel v{}", env!("CARGO_PKG_VERSION"));
    println!("GitHub progress reports, summarized\n");

    let default_days = config.default_period_days;
    let orchestrator = Orchestrator::new(config.clone())?;
    let subscriptions = orchestrator.subscriptions().to_vec();

    let repo = if subscriptions.is_empty() {
        println!("No subscriptions yet (add some with `repo-sentinel subscriptions add owner/repo`).");
        prompt_required("Repository (owner/repo)")?
    } else {
        println!("Subscriptions:");
        for (i, repo) in subscriptions.iter().enumerate() {
            println!("  {}. {}", i + 1, repo);
        }
        let choice = prompt_with_default("Repository (number or owner/repo)", "1")?;
        pick_repository(&subscriptions, &choice)
    };

    let selection = prompt_with_default("Selection type (period/range)", "period")?;
    let window = if selection.eq_ignore_ascii_case("range") {
        let today = Utc::now().date_naive();
        let week_ago = today - Duration::days(7);
        let since = prompt_with_default("Start date", &week_ago.format("%Y-%m-%d").to_string())?;
        let until = prompt_with_default("End date", &today.format("%Y-%m-%d").to_string())?;
        ReportWindow::range(&since, &until)?
    } else {
        let input = prompt_with_default("Days back (1-30)", &default_days.to_string())?;
        let days = input.parse().unwrap_or(default_days).clamp(1, 30);
        ReportWindow::period(days)?
    };

    run_report(config, &repo, &window, true).await
}

/// Resolve a 1-based index into the list, or take the input as a repository name
fn pick_repository(subscriptions: &[String], choice: &str) -> String {
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| subscriptions.get(i).cloned())
        .unwrap_or_else(|| choice.to_string())
}

fn handle_subscriptions(
    orchestrator: &mut Orchestrator,
    command: SubscriptionCommand,
) -> anyhow::Result<()> {
    match command {
        SubscriptionCommand::List => {
            let subscriptions = orchestrator.subscriptions();
            if subscriptions.is_empty() {
                println!("No subscriptions");
            }
            for repo in subscriptions {
                println!("{}", repo);
            }
        }
        SubscriptionCommand::Add { repo } => {
            let change = orchestrator.add_subscription(&repo)?;
            println!("✓ {}", change.message());
        }
        SubscriptionCommand::Remove { repo } => {
            let change = orchestrator.remove_subscription(&repo)?;
            println!("{}", change.message());
        }
    }
    Ok(())
}

fn init_config(force: bool) -> anyhow::Result<()> {
    let config_path = Config::default_config_path()?;

    if config_path.exists() && !force {
        eprintln!("Config file already exists at: {}", config_path.display());
        eprintln!("Use --force to overwrite");
        std::process::exit(1);
    }

    Config::create_default()?;
    println!("✓ Created config file at: {}", config_path.display());
    println!("\nSet GITHUB_TOKEN (or github_token in the config) to raise API limits,");
    println!("and ANTHROPIC_AUTH_TOKEN (or claude_api_key) to generate reports.");
    Ok(())
}

fn clear_cache(config: &Config) -> anyhow::Result<()> {
    let cache_dir = config.cache_dir()?;
    if !cache_dir.exists() {
        println!("Cache directory does not exist");
        return Ok(());
    }

    let cache = ai::cache::ReportCache::new(&cache_dir, config.cache_ttl_hours)
        .context("Could not open cache database")?;
    cache.clear()?;
    println!("✓ Cache cleared: {}", cache_dir.display());
    Ok(())
}

fn cache_stats(config: &Config) -> anyhow::Result<()> {
    let cache_dir = config.cache_dir()?;
    if !cache_dir.exists() {
        println!("Cache directory does not exist");
        return Ok(());
    }

    println!("Cache directory: {}", cache_dir.display());
    match ai::cache::ReportCache::new(&cache_dir, config.cache_ttl_hours) {
        Ok(cache) => {
            let stats = cache.stats();
            println!("Total entries: {}", stats.total_entries);
            println!("Database size: {}", stats.format_size());
        }
        Err(_) => println!("Could not open cache database"),
    }
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Prompt user with a default value (press Enter to accept default)
fn prompt_with_default(prompt: &str, default: &str) -> io::Result<String> {
    print!("{} [{}]: ", prompt, default);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

/// Prompt user for required value (cannot be empty)
fn prompt_required(prompt: &str) -> io::Result<String> {
    loop {
        print!("{}: ", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_string();

        if !input.is_empty() {
            return Ok(input);
        }
        eprintln!("This field is required. Please enter a value.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_repository() {
        let subscriptions = vec!["octo/demo".to_string(), "rust-lang/rust".to_string()];
        assert_eq!(pick_repository(&subscriptions, "2"), "rust-lang/rust");
        assert_eq!(pick_repository(&subscriptions, "1"), "octo/demo");
        assert_eq!(pick_repository(&subscriptions, "0"), "0");
        assert_eq!(pick_repository(&subscriptions, "9"), "9");
        assert_eq!(pick_repository(&subscriptions, "tokio-rs/tokio"), "tokio-rs/tokio");
    }
}
