use log::{info, warn};

use super::TimeSpec;
use crate::error::PipelineError;
use crate::models::Track;
use crate::source::PlaylistSource;

/// What to do when one hour of a multi-hour window cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Abort the whole run rather than build a truncated playlist
    #[default]
    FailFast,
    /// Log the failed hour and keep going
    BestEffort,
}

/// Collect every track in the window, hour after hour, keeping each page's order.
/// Tracks repeated across hours are kept.
pub fn collect(
    source: &dyn PlaylistSource,
    spec: &TimeSpec,
    policy: FetchPolicy,
) -> Result<Vec<Track>, PipelineError> {
    let (date, hours) = match spec {
        TimeSpec::Current => return source.fetch_current(),
        TimeSpec::Historical { date, hours } => (*date, hours),
    };

    let mut tracks = Vec::new();
    for &hour in hours {
        match source.fetch_hour(date, hour) {
            Ok(batch) => {
                info!("{date} hour {hour}: {} tracks", batch.len());
                tracks.extend(batch);
            }
            Err(e) if policy == FetchPolicy::BestEffort => {
                warn!("Skipping {date} hour {hour}: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(tracks)
}
