use log::{info, warn};

use crate::client::Catalog;
use crate::error::PipelineError;
use crate::models::{Playlist, Track};

/// Largest number of tracks the service accepts in one add request
pub const ADD_BATCH_SIZE: usize = 100;

/// Whether an existing playlist with the same title is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistPolicy {
    /// Always make a new playlist, even if one with this title exists
    #[default]
    AlwaysCreate,
    /// Append to the user's first playlist with this exact title, creating it if absent
    FindOrCreate,
}

/// Outcome of submitting matched tracks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: usize,
    pub failed: usize,
}

/// Get the playlist to fill, according to the policy
pub fn prepare_playlist(
    catalog: &dyn Catalog,
    title: &str,
    policy: PlaylistPolicy,
) -> Result<Playlist, PipelineError> {
    if policy == PlaylistPolicy::FindOrCreate {
        if let Some(existing) = catalog.find_playlist(title)? {
            info!("Reusing playlist '{}' ({})", existing.title, existing.sink_id);
            return Ok(existing);
        }
    }

    let playlist = catalog.create_playlist(title)?;
    info!("Created playlist '{}' ({})", playlist.title, playlist.sink_id);
    Ok(playlist)
}

/// Catalog ids of the matched tracks, in playlist order
pub fn matched_ids(tracks: &[Track]) -> Vec<String> {
    tracks
        .iter()
        .filter(|t| t.is_matched())
        .filter_map(|t| t.catalog_id.clone())
        .collect()
}

/// Submit every matched track, dropping the rest. A rejected batch is counted,
/// not propagated.
pub fn add_tracks(catalog: &dyn Catalog, playlist: &Playlist, tracks: &[Track]) -> AddReport {
    let ids = matched_ids(tracks);
    let mut report = AddReport::default();

    for batch in ids.chunks(ADD_BATCH_SIZE) {
        match catalog.add_tracks(&playlist.sink_id, batch) {
            Ok(()) => report.added += batch.len(),
            Err(e) => {
                warn!("Failed to add {} tracks to '{}': {e}", batch.len(), playlist.title);
                report.failed += batch.len();
            }
        }
    }

    report
}
