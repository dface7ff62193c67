use log::info;

use super::aggregator::{self, FetchPolicy};
use super::assembler::{self, AddReport, PlaylistPolicy};
use super::matcher::{self, MatchOutcome};
use super::TimeSpec;
use crate::client::Catalog;
use crate::error::PipelineError;
use crate::models::{Playlist, Track};
use crate::source::PlaylistSource;

/// Knobs for one run of the pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub fetch_policy: FetchPolicy,
    pub playlist_policy: PlaylistPolicy,
    /// Match and report, but leave the service's playlists untouched
    pub dry_run: bool,
}

/// Everything a run produced, for the final summary
#[derive(Debug)]
pub struct RunReport {
    /// Tracks in playlist order, with `catalog_id` filled in where attempted
    pub tracks: Vec<Track>,
    /// One entry per track, same order
    pub outcomes: Vec<MatchOutcome>,
    /// `None` on a dry run
    pub playlist: Option<Playlist>,
    pub added: AddReport,
}

impl RunReport {
    pub fn found(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == MatchOutcome::Found)
            .count()
    }

    pub fn missing(&self) -> usize {
        self.outcomes.len() - self.found()
    }
}

/// Drives a station source and a catalog through one playlist build
pub struct PlaylistBuilder<'a> {
    source: &'a dyn PlaylistSource,
    catalog: &'a dyn Catalog,
    options: BuildOptions,
}

impl<'a> PlaylistBuilder<'a> {
    pub fn new(
        source: &'a dyn PlaylistSource,
        catalog: &'a dyn Catalog,
        options: BuildOptions,
    ) -> Self {
        Self {
            source,
            catalog,
            options,
        }
    }

    /// Authenticate, gather the window's tracks, match each one, then fill the playlist.
    /// Nothing is created on the service unless every earlier step succeeded.
    pub fn build(&self, spec: &TimeSpec, title: &str) -> Result<RunReport, PipelineError> {
        let user = self.catalog.authenticate()?;
        info!("Authenticated as '{user}'");

        let mut tracks = aggregator::collect(self.source, spec, self.options.fetch_policy)?;
        info!("Collected {} tracks", tracks.len());

        println!("**** BUILDING PLAYLIST: \"{title}\" ****");
        let mut outcomes = Vec::with_capacity(tracks.len());
        for track in tracks.iter_mut() {
            let outcome = matcher::match_track(self.catalog, track)?;
            let tag = match outcome {
                MatchOutcome::Found => "FOUND:  ",
                MatchOutcome::Missing => "MISSING:",
            };
            println!("{tag} {} {}", track.artist_display(), track.title_display());
            outcomes.push(outcome);
        }

        if self.options.dry_run {
            println!("\nDEBUG MODE: Playlist '{title}' (would create via API)");
            for (i, id) in assembler::matched_ids(&tracks).iter().enumerate() {
                println!("     {}. {id}", i + 1);
            }
            return Ok(RunReport {
                tracks,
                outcomes,
                playlist: None,
                added: AddReport::default(),
            });
        }

        let playlist = assembler::prepare_playlist(self.catalog, title, self.options.playlist_policy)?;
        let added = assembler::add_tracks(self.catalog, &playlist, &tracks);

        Ok(RunReport {
            tracks,
            outcomes,
            playlist: Some(playlist),
            added,
        })
    }
}
