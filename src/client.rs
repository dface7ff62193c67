use crate::config::Config;
use crate::error::PipelineError;
use crate::models::{CurrentUser, Playlist, PlaylistInfo, PlaylistPage, SearchResponse};
use log::{debug, warn};
use serde_json::json;
use ureq::{Agent, AgentBuilder, Request};
use urlencoding::encode;

/// Streaming-service operations the playlist pipeline needs
#[cfg_attr(test, mockall::automock)]
pub trait Catalog {
    /// Check the credential and return the id of the account it belongs to
    fn authenticate(&self) -> Result<String, PipelineError>;

    /// Run one track search and return the top result's id, if there is a usable one
    fn search_track(&self, query: &str) -> Result<Option<String>, PipelineError>;

    /// Create a new playlist owned by the user
    fn create_playlist(&self, title: &str) -> Result<Playlist, PipelineError>;

    /// First of the user's playlists whose title matches exactly
    fn find_playlist(&self, title: &str) -> Result<Option<Playlist>, PipelineError>;

    /// Append tracks, in order, to an existing playlist
    fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), PipelineError>;
}

/// A Spotify Web API client holding a bearer token for one user
pub struct SpotifyClient {
    agent: Agent,
    base_url: String,
    username: String,
    access_token: String,
}

impl SpotifyClient {
    /// Create a new client for the given user with configuration from environment
    pub fn new(config: &Config, username: &str) -> Self {
        let agent = AgentBuilder::new().timeout(config.timeout).build();

        SpotifyClient {
            agent,
            base_url: config.sink_base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            access_token: config.access_token.clone(),
        }
    }

    fn authorized(&self, request: Request) -> Request {
        request.set("Authorization", &format!("Bearer {}", self.access_token))
    }

    fn get(&self, url: &str) -> Request {
        debug!("GET {url}");
        self.authorized(self.agent.get(url))
    }

    fn post(&self, url: &str) -> Request {
        debug!("POST {url}");
        self.authorized(self.agent.post(url))
    }
}

/// Rejected credentials are an auth failure, anything else leaves the service unusable
fn sink_error(context: &str, err: ureq::Error) -> PipelineError {
    match err {
        ureq::Error::Status(code @ (401 | 403), _) => {
            PipelineError::AuthFailure(format!("{context}: HTTP {code}"))
        }
        other => PipelineError::SinkUnavailable(format!("{context}: {other}")),
    }
}

/// Id of the first track in a search response body. An empty result list or an
/// unexpected body is a miss, not a failure.
fn top_track_id(body: &str) -> Option<String> {
    let parsed: SearchResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Unexpected search response: {e}");
            return None;
        }
    };

    parsed
        .tracks?
        .items
        .into_iter()
        .next()
        .and_then(|track| track.id)
        .filter(|id| !id.is_empty())
}

impl Catalog for SpotifyClient {
    fn authenticate(&self) -> Result<String, PipelineError> {
        let url = format!("{}/me", self.base_url);

        let user: CurrentUser = self
            .get(&url)
            .call()
            .map_err(|e| sink_error("profile lookup failed", e))?
            .into_json()
            .map_err(|e| PipelineError::AuthFailure(format!("unreadable profile: {e}")))?;

        if user.id != self.username {
            warn!(
                "Credential belongs to '{}' ({}), not '{}'",
                user.id,
                user.display_name.as_deref().unwrap_or("no display name"),
                self.username
            );
        }

        Ok(user.id)
    }

    fn search_track(&self, query: &str) -> Result<Option<String>, PipelineError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .get(&url)
            .query("q", query)
            .query("type", "track")
            .query("limit", "1")
            .call()
            .map_err(|e| sink_error("track search failed", e))?;

        let body = match response.into_string() {
            Ok(body) => body,
            Err(e) => {
                debug!("Unreadable search response for '{query}': {e}");
                return Ok(None);
            }
        };

        Ok(top_track_id(&body))
    }

    fn create_playlist(&self, title: &str) -> Result<Playlist, PipelineError> {
        let url = format!("{}/users/{}/playlists", self.base_url, encode(&self.username));

        let created: PlaylistInfo = self
            .post(&url)
            .send_json(json!({ "name": title, "public": true }))
            .map_err(|e| sink_error("playlist creation failed", e))?
            .into_json()
            .map_err(|e| {
                PipelineError::SinkUnavailable(format!("unreadable create response: {e}"))
            })?;

        Ok(created.into())
    }

    fn find_playlist(&self, title: &str) -> Result<Option<Playlist>, PipelineError> {
        let mut next = Some(format!("{}/me/playlists?limit=50", self.base_url));

        while let Some(url) = next {
            let page: PlaylistPage = self
                .get(&url)
                .call()
                .map_err(|e| sink_error("playlist listing failed", e))?
                .into_json()
                .map_err(|e| {
                    PipelineError::SinkUnavailable(format!("unreadable playlist listing: {e}"))
                })?;

            if let Some(found) = page.items.into_iter().find(|p| p.name == title) {
                return Ok(Some(found.into()));
            }
            next = page.next;
        }

        Ok(None)
    }

    fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), PipelineError> {
        let url = format!("{}/playlists/{}/tracks", self.base_url, encode(playlist_id));
        let uris: Vec<String> = track_ids
            .iter()
            .map(|id| format!("spotify:track:{id}"))
            .collect();

        self.post(&url)
            .send_json(json!({ "uris": uris }))
            .map_err(|e| sink_error("adding tracks failed", e))?;

        Ok(())
    }
}
