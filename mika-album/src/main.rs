//! mika-album - random album lookup from the command line
//!
//! Joins its arguments into a filter string, runs one lookup and prints the
//! record. Exits non-zero when the filter matches nothing or the Discogs
//! token is missing.
//!
//! ```text
//! mika-album "[Young Thug, Rap, 2015]"
//! mika-album --json "[Rock, 2011]"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mika_album::http::default_user_agent;
use mika_album::{AlbumPipeline, AlbumRecord, HttpContext};
use mika_common::config::{CredentialOverrides, Credentials, TomlConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for mika-album
#[derive(Parser, Debug)]
#[command(name = "mika-album")]
#[command(about = "Find a random album matching a loose filter")]
#[command(version)]
struct Args {
    /// Filter text, e.g. "[Young Thug, Rap, 2015]" (words are joined with spaces)
    filter: Vec<String>,

    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Discogs personal access token
    #[arg(long)]
    discogs_token: Option<String>,

    /// Spotify client id
    #[arg(long)]
    spotify_client_id: Option<String>,

    /// Spotify client secret
    #[arg(long)]
    spotify_client_secret: Option<String>,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,

    /// Log level when RUST_LOG is not set (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let toml_config =
        TomlConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = CredentialOverrides {
        discogs_token: args.discogs_token.clone(),
        spotify_client_id: args.spotify_client_id.clone(),
        spotify_client_secret: args.spotify_client_secret.clone(),
    };
    let credentials = Credentials::resolve(&overrides, &toml_config);

    let user_agent = toml_config
        .user_agent
        .clone()
        .unwrap_or_else(default_user_agent);
    let http = Arc::new(HttpContext::new(user_agent));

    let raw_filter = args.filter.join(" ");
    info!(filter = %raw_filter, "Looking up album");

    let outcome = match AlbumPipeline::from_credentials(Arc::clone(&http), &credentials) {
        Ok(pipeline) => pipeline.lookup(&raw_filter).await,
        Err(e) => Err(e),
    };

    http.shutdown().await;

    match outcome {
        Ok(album) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&album).context("Failed to serialize record")?
                );
            } else {
                print_record(&album);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Lookup failed");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_record(album: &AlbumRecord) {
    println!("{}", album.title.to_uppercase());
    println!("{}", album.link_url);
    println!();
    println!("Artist: {}", album.artist);
    println!("Year: {}", album.year);
    println!("Genres: {}", album.genres);
    println!("Styles: {}", album.styles);
    if let Some(cover) = &album.cover_url {
        println!("Cover: {}", cover);
    }
    println!();
    println!("Tracklist:");
    println!("{}", album.tracklist);
}
