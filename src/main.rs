use anyhow::Result;
use clap::Parser;
use log::warn;

mod client;
mod config;
mod error;
mod models;
mod playlist;
mod source;


use crate::client::SpotifyClient;
use crate::config::load_config;
use crate::playlist::{BuildOptions, FetchPolicy, PlaylistBuilder, PlaylistPolicy};
use crate::source::KexpSource;

#[derive(Parser)]
#[command(name = "radio-playlist")]
#[command(about = "Populate a new Spotify playlist with songs from an hour or hours of KEXP radio")]
#[command(version)]
struct Args {
    /// Spotify user that will own the playlist
    #[arg(long)]
    username: String,

    /// Title of the playlist to create
    #[arg(long)]
    playlist: String,

    /// Accepted for compatibility, ignored
    #[arg(long)]
    day: Option<String>,

    /// Accepted for compatibility, ignored
    #[arg(long, default_value_t = 1)]
    weeks: u32,

    /// Date of the hours to fetch, month/day/year (defaults to today)
    #[arg(long)]
    mdy: Option<String>,

    /// Hour of the day (0-23), or a range like 7-10 which stops before 10
    #[arg(long)]
    hour: Option<String>,

    /// Add to an existing playlist with the same title instead of creating another
    #[arg(long = "find-existing")]
    find_existing: bool,

    /// Skip hours the station fails to serve instead of aborting
    #[arg(long = "best-effort")]
    best_effort: bool,

    /// Enable debug mode - print playlist details to stdout instead of uploading
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.day.is_some() {
        warn!("--day is not supported and will be ignored");
    }
    if args.weeks != 1 {
        warn!("--weeks is not supported and will be ignored");
    }

    // Load configuration from .env
    let config = load_config()?;

    // Bad time input is reported before anything touches the network
    let today = chrono::Local::now().date_naive();
    let spec = playlist::resolve(
        args.hour.as_deref(),
        args.mdy.as_deref(),
        today,
        config.range_end,
    )?;

    let source = KexpSource::new(&config.source_base_url, config.timeout, config.midnight_label);
    let client = SpotifyClient::new(&config, &args.username);

    let options = BuildOptions {
        fetch_policy: if args.best_effort {
            FetchPolicy::BestEffort
        } else {
            FetchPolicy::FailFast
        },
        playlist_policy: if args.find_existing {
            PlaylistPolicy::FindOrCreate
        } else {
            PlaylistPolicy::AlwaysCreate
        },
        dry_run: args.debug,
    };

    let report = PlaylistBuilder::new(&source, &client, options).build(&spec, &args.playlist)?;

    println!("\n=== PLAYLIST SUMMARY ===");
    println!(
        "{} tracks: {} found, {} missing",
        report.tracks.len(),
        report.found(),
        report.missing()
    );

    match &report.playlist {
        Some(playlist) => {
            println!(
                "✓ Playlist '{}' (ID: {}): {} tracks added",
                playlist.title, playlist.sink_id, report.added.added
            );
            if report.added.failed > 0 {
                eprintln!(
                    "✗ {} matched tracks could not be added to '{}'",
                    report.added.failed, playlist.title
                );
            }
        }
        None => println!("Debug mode - no playlist created"),
    }

    Ok(())
}
