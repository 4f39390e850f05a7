//! Fill an edit session from remote metadata.
//!
//! Enrichment runs as two sequential lookups: details (fatal on failure)
//! and videos (a failure only means "no trailer"). Results are written
//! into the same [`EditSession`] a human edit would use, and the session is
//! borrowed mutably for the whole run so two enrichments cannot interleave.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::traits::{MediaDetails, MediaType, MetadataService, Video};
use marquee_core::config::AppConfig;
use marquee_core::models::{EntryKind, Source};
use marquee_core::session::EditSession;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("lookup failed for TMDb id {id}: {reason}")]
    LookupFailed { id: u64, reason: String },
}

/// URL building rules for enrichment results.
#[derive(Debug, Clone)]
pub struct EnrichSettings {
    pub image_base_url: String,
    pub poster_size: String,
    pub backdrop_size: String,
    pub trailer_site: String,
    pub trailer_watch_url: String,
    pub embed_base_url: String,
    pub embed_title: String,
}

impl EnrichSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            image_base_url: config.tmdb.image_base_url.trim_end_matches('/').to_string(),
            poster_size: config.tmdb.poster_size.clone(),
            backdrop_size: config.tmdb.backdrop_size.clone(),
            trailer_site: config.trailer.site.clone(),
            trailer_watch_url: config.trailer.watch_url.clone(),
            embed_base_url: config.embed.base_url.trim_end_matches('/').to_string(),
            embed_title: config.embed.title.clone(),
        }
    }

    fn image_url(&self, size: &str, path: Option<&str>) -> String {
        path.map(|p| format!("{}/{size}{p}", self.image_base_url))
            .unwrap_or_default()
    }

    /// Watch URL of the first trailer hosted on the expected site.
    pub fn trailer_url(&self, videos: &[Video]) -> Option<String> {
        videos
            .iter()
            .find(|v| v.site == self.trailer_site && v.kind == "Trailer")
            .map(|v| format!("{}{}", self.trailer_watch_url, v.key))
    }

    /// Embeddable playback source for a resource.
    pub fn embed_source(&self, media: MediaType, id: u64) -> Source {
        Source::video(
            self.embed_title.clone(),
            format!("{}/{media}?tmdb={id}", self.embed_base_url),
        )
    }
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// What an enrichment run resolved and changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOutcome {
    pub media: MediaType,
    pub trailer_found: bool,
    pub source_added: bool,
}

/// Look up `external_id` and merge the results into `session`.
///
/// A declared series is looked up as `tv` only. Anything else is tried as
/// `movie` first and retried as `tv` when the service reports not-found.
/// On success the session's kind follows the resolved type.
pub async fn enrich<S: MetadataService>(
    service: &S,
    settings: &EnrichSettings,
    session: &mut EditSession,
    external_id: u64,
    declared: Option<EntryKind>,
) -> Result<EnrichOutcome, EnrichError> {
    let (media, details) = resolve(service, external_id, declared).await?;
    info!(id = external_id, %media, "Resolved TMDb resource");

    session.kind = match media {
        MediaType::Movie => EntryKind::Movie,
        MediaType::Tv => EntryKind::Series,
    };
    apply_details(settings, session, details);

    let trailer = match service.videos(media, external_id).await {
        Ok(videos) => settings.trailer_url(&videos),
        Err(e) => {
            warn!(id = external_id, error = %e, "Videos lookup failed, leaving trailer blank");
            None
        }
    };
    let trailer_found = trailer.is_some();
    session.fields.trailer_url = trailer.unwrap_or_default();

    let source_added = session
        .sources
        .prepend_unique(settings.embed_source(media, external_id));
    debug!(trailer_found, source_added, "Enrichment applied");

    Ok(EnrichOutcome {
        media,
        trailer_found,
        source_added,
    })
}

async fn resolve<S: MetadataService>(
    service: &S,
    id: u64,
    declared: Option<EntryKind>,
) -> Result<(MediaType, MediaDetails), EnrichError> {
    if declared == Some(EntryKind::Series) {
        return match lookup(service, MediaType::Tv, id).await? {
            Some(details) => Ok((MediaType::Tv, details)),
            None => Err(EnrichError::LookupFailed {
                id,
                reason: "not found as a series".into(),
            }),
        };
    }

    if let Some(details) = lookup(service, MediaType::Movie, id).await? {
        return Ok((MediaType::Movie, details));
    }
    debug!(id, "Not found as a movie, retrying as tv");
    match lookup(service, MediaType::Tv, id).await? {
        Some(details) => Ok((MediaType::Tv, details)),
        None => Err(EnrichError::LookupFailed {
            id,
            reason: "not found as a movie or series".into(),
        }),
    }
}

async fn lookup<S: MetadataService>(
    service: &S,
    media: MediaType,
    id: u64,
) -> Result<Option<MediaDetails>, EnrichError> {
    service.details(media, id).await.map_err(|e| {
        warn!(id, %media, error = %e, "Details lookup failed");
        EnrichError::LookupFailed {
            id,
            reason: e.to_string(),
        }
    })
}

fn apply_details(settings: &EnrichSettings, session: &mut EditSession, details: MediaDetails) {
    let fields = &mut session.fields;
    fields.year = details
        .release_date
        .as_deref()
        .and_then(|d| d.split('-').next())
        .unwrap_or_default()
        .to_string();
    fields.image = settings.image_url(&settings.poster_size, details.poster_path.as_deref());
    fields.cover = settings.image_url(&settings.backdrop_size, details.backdrop_path.as_deref());
    fields.title = details.title.unwrap_or_default();
    fields.description = details.overview.unwrap_or_default();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Error)]
    #[error("service returned status {0}")]
    struct FakeError(u16);

    /// In-memory metadata service that records every call.
    #[derive(Default)]
    struct FakeService {
        details: HashMap<(MediaType, u64), MediaDetails>,
        videos: HashMap<(MediaType, u64), Vec<Video>>,
        details_status: Option<u16>,
        videos_status: Option<u16>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MetadataService for FakeService {
        type Error = FakeError;

        async fn details(
            &self,
            media: MediaType,
            id: u64,
        ) -> Result<Option<MediaDetails>, FakeError> {
            self.record(format!("details {media} {id}"));
            if let Some(status) = self.details_status {
                return Err(FakeError(status));
            }
            Ok(self.details.get(&(media, id)).cloned())
        }

        async fn videos(&self, media: MediaType, id: u64) -> Result<Vec<Video>, FakeError> {
            self.record(format!("videos {media} {id}"));
            if let Some(status) = self.videos_status {
                return Err(FakeError(status));
            }
            Ok(self.videos.get(&(media, id)).cloned().unwrap_or_default())
        }
    }

    fn heat() -> MediaDetails {
        MediaDetails {
            title: Some("Heat".into()),
            overview: Some("A group of high-end professional thieves...".into()),
            release_date: Some("1995-12-15".into()),
            poster_path: Some("/poster.jpg".into()),
            backdrop_path: Some("/backdrop.jpg".into()),
        }
    }

    fn trailer(site: &str, kind: &str, key: &str) -> Video {
        Video {
            site: site.into(),
            kind: kind.into(),
            key: key.into(),
        }
    }

    #[tokio::test]
    async fn test_enrich_movie() {
        let mut service = FakeService::default();
        service.details.insert((MediaType::Movie, 949), heat());
        service.videos.insert(
            (MediaType::Movie, 949),
            vec![
                trailer("YouTube", "Teaser", "teaser1"),
                trailer("Vimeo", "Trailer", "vimeo1"),
                trailer("YouTube", "Trailer", "yt1"),
                trailer("YouTube", "Trailer", "yt2"),
            ],
        );

        let mut session = EditSession::create(EntryKind::Movie);
        let outcome = enrich(
            &service,
            &EnrichSettings::default(),
            &mut session,
            949,
            Some(EntryKind::Movie),
        )
        .await
        .unwrap();

        assert_eq!(outcome.media, MediaType::Movie);
        assert!(outcome.trailer_found);
        assert_eq!(session.kind, EntryKind::Movie);
        assert_eq!(session.fields.title, "Heat");
        assert_eq!(session.fields.year, "1995");
        assert_eq!(
            session.fields.image,
            "https://image.tmdb.org/t/p/w500/poster.jpg"
        );
        assert_eq!(
            session.fields.cover,
            "https://image.tmdb.org/t/p/original/backdrop.jpg"
        );
        assert_eq!(
            session.fields.trailer_url,
            "https://www.youtube.com/watch?v=yt1"
        );
        assert_eq!(
            session.sources.as_slice()[0].url(),
            "https://vidsrc.net/embed/movie?tmdb=949"
        );
        assert_eq!(
            session.sources.as_slice()[0].title(),
            Some("vidsrc.net")
        );
        assert_eq!(service.calls(), vec!["details movie 949", "videos movie 949"]);
    }

    #[tokio::test]
    async fn test_movie_not_found_falls_back_to_tv() {
        let mut service = FakeService::default();
        service.details.insert(
            (MediaType::Tv, 42),
            MediaDetails {
                title: Some("Show".into()),
                release_date: Some("2019-05-01".into()),
                ..Default::default()
            },
        );

        let mut session = EditSession::create(EntryKind::Movie);
        let outcome = enrich(
            &service,
            &EnrichSettings::default(),
            &mut session,
            42,
            Some(EntryKind::Movie),
        )
        .await
        .unwrap();

        assert_eq!(outcome.media, MediaType::Tv);
        assert_eq!(session.kind, EntryKind::Series);
        assert_eq!(session.fields.title, "Show");
        assert_eq!(session.fields.year, "2019");
        assert_eq!(session.fields.image, "");
        assert_eq!(session.fields.description, "");
        assert_eq!(session.fields.trailer_url, "");
        assert_eq!(
            session.sources.as_slice()[0].url(),
            "https://vidsrc.net/embed/tv?tmdb=42"
        );
        assert_eq!(
            service.calls(),
            vec!["details movie 42", "details tv 42", "videos tv 42"]
        );
    }

    #[tokio::test]
    async fn test_declared_series_skips_movie() {
        let mut service = FakeService::default();
        service
            .details
            .insert((MediaType::Movie, 7), heat());

        let mut session = EditSession::create(EntryKind::Series);
        let err = enrich(
            &service,
            &EnrichSettings::default(),
            &mut session,
            7,
            Some(EntryKind::Series),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EnrichError::LookupFailed { id: 7, .. }));
        assert_eq!(service.calls(), vec!["details tv 7"]);
        assert_eq!(session, EditSession::create(EntryKind::Series));
    }

    #[tokio::test]
    async fn test_not_found_twice_fails() {
        let service = FakeService::default();
        let mut session = EditSession::create(EntryKind::Movie);
        let err = enrich(&service, &EnrichSettings::default(), &mut session, 1, None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not found as a movie or series"));
        assert!(session.sources.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_does_not_retry() {
        let service = FakeService {
            details_status: Some(401),
            ..Default::default()
        };
        let mut session = EditSession::create(EntryKind::Movie);
        let err = enrich(&service, &EnrichSettings::default(), &mut session, 5, None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("status 401"));
        assert_eq!(service.calls(), vec!["details movie 5"]);
    }

    #[tokio::test]
    async fn test_videos_failure_is_not_fatal() {
        let mut service = FakeService {
            videos_status: Some(500),
            ..Default::default()
        };
        service.details.insert((MediaType::Movie, 949), heat());

        let mut session = EditSession::create(EntryKind::Movie);
        session.fields.trailer_url = "https://old-trailer".into();
        let outcome = enrich(&service, &EnrichSettings::default(), &mut session, 949, None)
            .await
            .unwrap();

        assert!(!outcome.trailer_found);
        assert_eq!(session.fields.trailer_url, "");
        assert_eq!(session.fields.title, "Heat");
    }

    #[tokio::test]
    async fn test_repeat_enrichment_keeps_user_sources() {
        let mut service = FakeService::default();
        service.details.insert((MediaType::Movie, 949), heat());

        let mut session = EditSession::create(EntryKind::Movie);
        session.sources.add("Mine", "https://mine");

        let settings = EnrichSettings::default();
        let first = enrich(&service, &settings, &mut session, 949, None)
            .await
            .unwrap();
        let second = enrich(&service, &settings, &mut session, 949, None)
            .await
            .unwrap();

        assert!(first.source_added);
        assert!(!second.source_added);
        let urls: Vec<&str> = session
            .sources
            .as_slice()
            .iter()
            .map(|s| s.url())
            .collect();
        assert_eq!(
            urls,
            vec!["https://vidsrc.net/embed/movie?tmdb=949", "https://mine"]
        );
    }
}
