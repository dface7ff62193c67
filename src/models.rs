use serde::Deserialize;
use std::fmt;

/// One song play as published by the station
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Track {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub label: Option<String>,
    /// `None` = never matched, `Some("")` = searched without a usable result
    pub catalog_id: Option<String>,
}

impl Track {
    /// Build an unmatched track, treating blank fields as absent
    pub fn new(artist: Option<String>, title: Option<String>, label: Option<String>) -> Self {
        Track {
            artist: non_blank(artist),
            title: non_blank(title),
            label: non_blank(label),
            catalog_id: None,
        }
    }

    /// The free-text catalog query for this track, if it has both an artist and a title
    pub fn search_query(&self) -> Option<String> {
        match (&self.artist, &self.title) {
            (Some(artist), Some(title)) => Some(format!("{artist} {title}")),
            _ => None,
        }
    }

    /// True when a catalog search produced an identifier we can submit
    pub fn is_matched(&self) -> bool {
        self.catalog_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn artist_display(&self) -> &str {
        self.artist.as_deref().unwrap_or("")
    }

    pub fn title_display(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | {} | {}]",
            self.artist_display(),
            self.title_display(),
            self.label.as_deref().unwrap_or("")
        )
    }
}

/// Whitespace-only counts as absent; anything else is kept verbatim
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A playlist as it exists on the streaming service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub title: String,
    pub sink_id: String,
}

/// The JSON object embedded in each play container of the station's page
#[derive(Debug, Deserialize)]
pub struct PlayRecord {
    #[serde(rename = "ArtistName", default)]
    pub artist_name: Option<String>,
    #[serde(rename = "TrackName", default)]
    pub track_name: Option<String>,
    #[serde(rename = "LabelName", default)]
    pub label_name: Option<String>,
}

impl From<PlayRecord> for Track {
    fn from(record: PlayRecord) -> Self {
        Track::new(record.artist_name, record.track_name, record.label_name)
    }
}

/// Response structure for the track search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<CatalogTrackPage>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogTrackPage {
    pub items: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogTrack {
    pub id: Option<String>,
}

/// Response structure for the current-user endpoint
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Response structure for playlist creation and playlist listings
#[derive(Debug, Deserialize)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
}

impl From<PlaylistInfo> for Playlist {
    fn from(info: PlaylistInfo) -> Self {
        Playlist {
            title: info.name,
            sink_id: info.id,
        }
    }
}

/// One page of the current user's playlists
#[derive(Debug, Deserialize)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistInfo>,
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_absent() {
        let track = Track::new(Some("  ".to_string()), Some("Song".to_string()), None);
        assert_eq!(track.artist, None);
        assert_eq!(track.title.as_deref(), Some("Song"));
        assert_eq!(track.search_query(), None);
    }

    #[test]
    fn test_search_query_joins_artist_and_title() {
        let track = Track::new(
            Some("Nina Simone".to_string()),
            Some("Sinnerman".to_string()),
            Some("Philips".to_string()),
        );
        assert_eq!(track.search_query().as_deref(), Some("Nina Simone Sinnerman"));
        assert_eq!(track.to_string(), "[Nina Simone | Sinnerman | Philips]");
    }

    #[test]
    fn test_search_query_keeps_source_text_verbatim() {
        let track = Track::new(
            Some("The Black Tones ".to_string()),
            Some(" Chubby Butterfly".to_string()),
            None,
        );
        assert_eq!(
            track.search_query().as_deref(),
            Some("The Black Tones   Chubby Butterfly")
        );
    }

    #[test]
    fn test_matched_requires_non_empty_id() {
        let mut track = Track::new(Some("A".to_string()), Some("B".to_string()), None);
        assert!(!track.is_matched());
        track.catalog_id = Some(String::new());
        assert!(!track.is_matched());
        track.catalog_id = Some("4uLU6hMCjMI75M1A2tKUQC".to_string());
        assert!(track.is_matched());
    }

    #[test]
    fn test_play_record_tolerates_missing_and_null_fields() {
        let record: PlayRecord =
            serde_json::from_str(r#"{"ArtistName": null, "TrackName": "Air Break"}"#).unwrap();
        let track = Track::from(record);
        assert_eq!(track.artist, None);
        assert_eq!(track.title.as_deref(), Some("Air Break"));
        assert_eq!(track.label, None);
    }
}
