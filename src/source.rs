use chrono::{Datelike, NaiveDate};
use log::debug;
use scraper::{Html, Selector};
use std::time::Duration;
use ureq::{Agent, AgentBuilder};

use crate::error::PipelineError;
use crate::models::{PlayRecord, Track};

/// Element holding one play, and the attribute carrying its JSON record
const PLAY_SELECTOR: &str = "div.Play";
const PLAY_RECORD_ATTR: &str = "data-playlistitem";

/// How hour 0 is rendered in the station's URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidnightLabel {
    /// `0AM`, as the station URLs have always been built
    #[default]
    ZeroAm,
    TwelveAm,
}

/// Anything that can publish what a station played
#[cfg_attr(test, mockall::automock)]
pub trait PlaylistSource {
    /// Tracks on the station's live playlist page
    fn fetch_current(&self) -> Result<Vec<Track>, PipelineError>;

    /// Tracks published for one hour of one day
    fn fetch_hour(&self, date: NaiveDate, hour: u32) -> Result<Vec<Track>, PipelineError>;
}

/// Render an hour of the day the way the station's archive URLs expect.
/// Hours up to and including 12 are `AM`, so noon renders as `12AM`.
pub fn hour_label(hour: u32, midnight: MidnightLabel) -> String {
    match hour {
        0 if midnight == MidnightLabel::TwelveAm => "12AM".to_string(),
        0..=12 => format!("{hour}AM"),
        _ => format!("{}PM", hour - 12),
    }
}

/// Pull every play record out of a station playlist page, in document order
pub fn parse_playlist_html(html: &str) -> Result<Vec<Track>, PipelineError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(PLAY_SELECTOR).map_err(|e| {
        PipelineError::SourceUnavailable(format!("invalid selector {PLAY_SELECTOR}: {e:?}"))
    })?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(PLAY_RECORD_ATTR))
        .map(|raw| {
            serde_json::from_str::<PlayRecord>(raw)
                .map(Track::from)
                .map_err(|e| {
                    PipelineError::SourceUnavailable(format!("malformed play record: {e}"))
                })
        })
        .collect()
}

/// KEXP's public playlist pages
pub struct KexpSource {
    agent: Agent,
    base_url: String,
    midnight: MidnightLabel,
}

impl KexpSource {
    pub fn new(base_url: &str, timeout: Duration, midnight: MidnightLabel) -> Self {
        let agent = AgentBuilder::new().timeout(timeout).build();

        KexpSource {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            midnight,
        }
    }

    /// URL of the archive page for one hour, `<base>/YYYY/MM/DD/<label>`
    pub fn hour_url(&self, date: NaiveDate, hour: u32) -> String {
        format!(
            "{}/{:04}/{:02}/{:02}/{}",
            self.base_url,
            date.year(),
            date.month(),
            date.day(),
            hour_label(hour, self.midnight)
        )
    }

    fn fetch_page(&self, url: &str) -> Result<Vec<Track>, PipelineError> {
        debug!("Fetching station playlist: {url}");

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| PipelineError::SourceUnavailable(format!("{url}: {e}")))?;

        let html = response
            .into_string()
            .map_err(|e| PipelineError::SourceUnavailable(format!("{url}: {e}")))?;

        let tracks = parse_playlist_html(&html)?;
        debug!("Parsed {} plays from {url}", tracks.len());
        Ok(tracks)
    }
}

impl PlaylistSource for KexpSource {
    fn fetch_current(&self) -> Result<Vec<Track>, PipelineError> {
        self.fetch_page(&self.base_url)
    }

    fn fetch_hour(&self, date: NaiveDate, hour: u32) -> Result<Vec<Track>, PipelineError> {
        self.fetch_page(&self.hour_url(date, hour))
    }
}
