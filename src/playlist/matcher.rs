use crate::client::Catalog;
use crate::error::PipelineError;
use crate::models::Track;

/// Result of looking one track up in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Found,
    Missing,
}

/// Look a track up with a single "<artist> <title>" search and record the top hit.
///
/// A track without an artist or title is left unmatched (`catalog_id` stays
/// `None`) and no search is made. A search that finds nothing usable stores the
/// empty id. Only a failure to reach the catalog is an error.
pub fn match_track(
    catalog: &dyn Catalog,
    track: &mut Track,
) -> Result<MatchOutcome, PipelineError> {
    let Some(query) = track.search_query() else {
        track.catalog_id = None;
        return Ok(MatchOutcome::Missing);
    };

    track.catalog_id = Some(catalog.search_track(&query)?.unwrap_or_default());

    if track.is_matched() {
        Ok(MatchOutcome::Found)
    } else {
        Ok(MatchOutcome::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockCatalog;
    use mockall::predicate::eq;

    fn track(artist: Option<&str>, title: Option<&str>) -> Track {
        Track::new(
            artist.map(str::to_string),
            title.map(str::to_string),
            Some("Sub Pop".to_string()),
        )
    }

    #[test]
    fn test_top_result_becomes_catalog_id() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_search_track()
            .with(eq("Built to Spill Carry the Zero"))
            .times(1)
            .returning(|_| Ok(Some("abc123".to_string())));

        let mut t = track(Some("Built to Spill"), Some("Carry the Zero"));
        let outcome = match_track(&catalog, &mut t).unwrap();

        assert_eq!(outcome, MatchOutcome::Found);
        assert_eq!(t.catalog_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_no_result_stores_empty_id() {
        let mut catalog = MockCatalog::new();
        catalog.expect_search_track().returning(|_| Ok(None));

        let mut t = track(Some("Obscure"), Some("Demo"));
        let outcome = match_track(&catalog, &mut t).unwrap();

        assert_eq!(outcome, MatchOutcome::Missing);
        assert_eq!(t.catalog_id.as_deref(), Some(""));
    }

    #[test]
    fn test_incomplete_track_never_searches() {
        let mut catalog = MockCatalog::new();
        catalog.expect_search_track().never();

        for (artist, title) in [(None, Some("Title")), (Some("Artist"), None), (Some(""), Some("Title"))] {
            let mut t = track(artist, title);
            let outcome = match_track(&catalog, &mut t).unwrap();
            assert_eq!(outcome, MatchOutcome::Missing);
            assert_eq!(t.catalog_id, None);
        }
    }

    #[test]
    fn test_matching_twice_issues_same_query() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_search_track()
            .with(eq("Low Lullaby"))
            .times(2)
            .returning(|_| Ok(Some("id-1".to_string())));

        let mut t = track(Some("Low"), Some("Lullaby"));
        match_track(&catalog, &mut t).unwrap();
        let first = t.catalog_id.clone();
        match_track(&catalog, &mut t).unwrap();

        assert_eq!(t.catalog_id, first);
    }

    #[test]
    fn test_unreachable_catalog_is_an_error() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_search_track()
            .returning(|_| Err(PipelineError::SinkUnavailable("connection refused".to_string())));

        let mut t = track(Some("Low"), Some("Lullaby"));
        assert!(matches!(
            match_track(&catalog, &mut t),
            Err(PipelineError::SinkUnavailable(_))
        ));
    }
}
