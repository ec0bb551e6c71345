use chrono::Utc;
use clap::{Parser, Subcommand};
use sophia_site::config::{self, SiteConfig};
use sophia_site::poller::Poller;
use sophia_site::source::{ArenaClient, fetch_round};
use sophia_site::types::FeedSnapshot;
use sophia_site::{generate, output};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sophia-site")]
#[command(about = "Site builder for the 9413 Sophia Avenue project")]
#[command(long_about = "\
Site builder for the 9413 Sophia Avenue project

Fetches the publication, archive and film channels from Are.na and renders
them into a single self-contained page.

Source structure:

  site/
  ├── config.toml          # Site config (optional, overrides stock defaults)
  ├── info.md              # Info modal body (optional, overrides [site].info)
  └── assets/              # Copied to output root (fonts, footer and contact images)

Logging is controlled with RUST_LOG (default: info).

Run 'sophia-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source directory (config.toml, info.md, assets/)
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for the fetched feed snapshot
    #[arg(long, default_value = ".sophia-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch all channels into a feed snapshot
    Fetch,
    /// Render the site from the last snapshot
    Generate,
    /// Fetch, then generate
    Build,
    /// Poll the channels and regenerate whenever one changes (Ctrl-C to stop)
    Watch,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch => {
            let config = config::load_config(&cli.source)?;
            let snapshot = fetch_snapshot(&config, &cli.temp_dir).await?;
            output::print_fetch_output(&snapshot.collections);
        }
        Command::Generate => {
            let config = config::load_config(&cli.source)?;
            let snapshot = read_snapshot(&cli.temp_dir)?;
            let report =
                generate::generate(&snapshot.collections, false, &config, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            let config = config::load_config(&cli.source)?;

            println!("==> Stage 1: Fetching channels");
            let snapshot = fetch_snapshot(&config, &cli.temp_dir).await?;
            output::print_fetch_output(&snapshot.collections);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report =
                generate::generate(&snapshot.collections, false, &config, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Watch => watch(&cli).await?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn fetch_snapshot(
    config: &SiteConfig,
    temp_dir: &Path,
) -> Result<FeedSnapshot, Box<dyn std::error::Error>> {
    let client = ArenaClient::new(&config.api)?;
    let collections = fetch_round(&client, &config.channels).await;
    let snapshot = FeedSnapshot {
        fetched_at: Utc::now(),
        collections,
    };
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(temp_dir.join("feed.json"), json)?;
    Ok(snapshot)
}

fn read_snapshot(temp_dir: &Path) -> Result<FeedSnapshot, Box<dyn std::error::Error>> {
    let path = temp_dir.join("feed.json");
    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {} (run 'fetch' first): {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Regenerate on every published state until Ctrl-C.
async fn watch(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(&cli.source)?;
    let client = Arc::new(ArenaClient::new(&config.api)?);
    let poller = Poller::new(client, config.channels.clone(), config.poll.interval());
    let handle = poller.spawn();
    let mut rx = handle.subscribe();

    println!(
        "==> Watching channels every {}s → {}",
        config.poll.interval_secs,
        cli.output.display()
    );
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    warn!("poller stopped");
                    break;
                }
                let state = rx.borrow_and_update().clone();
                let report = generate::generate(
                    &state.collections,
                    state.loading,
                    &config,
                    &cli.source,
                    &cli.output,
                )?;
                if !state.loading {
                    println!("{}", output::format_poll_event(&state.collections, &report));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping poller");
                break;
            }
        }
    }

    handle.shutdown();
    Ok(())
}
