use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use super::error::TmdbError;
use super::types::{TmdbDetails, TmdbVideosResponse};
use crate::traits::{MediaDetails, MediaType, MetadataService, Video};
use marquee_core::config::AppConfig;

const BASE_URL: &str = "https://api.themoviedb.org/3";

/// The Movie Database v3 REST client, authenticated with an API key.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Build a client from config. The API key comes from `TMDB_API_KEY`
    /// or `tmdb.api_key`.
    pub fn from_config(config: &AppConfig) -> Result<Self, TmdbError> {
        let api_key = config.api_key().ok_or(TmdbError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.tmdb.timeout_secs))
            .build()?;
        Ok(Self {
            api_key,
            base_url: config.tmdb.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full request URL for `path`, with the API key as a query parameter.
    fn endpoint(&self, path: &str) -> Result<Url, TmdbError> {
        let url = Url::parse_with_params(
            &format!("{}/{path}", self.base_url),
            &[("api_key", self.api_key.as_str())],
        )?;
        Ok(url)
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "TMDb API error");
            Err(TmdbError::Api {
                status,
                message: body,
            })
        }
    }
}

impl MetadataService for TmdbClient {
    type Error = TmdbError;

    async fn details(&self, media: MediaType, id: u64) -> Result<Option<MediaDetails>, TmdbError> {
        let path = format!("{media}/{id}");
        tracing::debug!(%path, "Fetching TMDb details");

        let resp = self.http.get(self.endpoint(&path)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(%path, "TMDb resource not found");
            return Ok(None);
        }

        let resp = Self::check_response(resp).await?;
        let details: TmdbDetails = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(Some(details.into_details()))
    }

    async fn videos(&self, media: MediaType, id: u64) -> Result<Vec<Video>, TmdbError> {
        let path = format!("{media}/{id}/videos");
        tracing::debug!(%path, "Fetching TMDb videos");

        let resp = self.http.get(self.endpoint(&path)?).send().await?;
        let resp = Self::check_response(resp).await?;
        let videos: TmdbVideosResponse = resp
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))?;

        Ok(videos.into_videos())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient {
            api_key: "k".into(),
            base_url: format!("{}/3", server.uri()),
            http: Client::new(),
        }
    }

    async fn respond(server: &MockServer, at: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(at))
            .and(query_param("api_key", "k"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[test]
    fn test_endpoint_carries_api_key() {
        let client = TmdbClient::new("secret".into());
        let url = client.endpoint("movie/42").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/42?api_key=secret"
        );
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let mut config = AppConfig::default();
        config.tmdb.api_key = Some("k".into());
        config.tmdb.base_url = "http://localhost:9000/3/".into();

        let client = TmdbClient::from_config(&config).unwrap();
        let url = client.endpoint("tv/7/videos").unwrap();
        assert!(url
            .as_str()
            .starts_with("http://localhost:9000/3/tv/7/videos?api_key="));
    }

    #[tokio::test]
    async fn test_details_found() {
        let server = MockServer::start().await;
        let body = json!({"id": 42, "name": "Show", "first_air_date": "2019-05-01"});
        respond(&server, "/3/tv/42", ResponseTemplate::new(200).set_body_json(body)).await;

        let details = client_for(&server)
            .details(MediaType::Tv, 42)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(details.title.as_deref(), Some("Show"));
        assert_eq!(details.release_date.as_deref(), Some("2019-05-01"));
    }

    #[tokio::test]
    async fn test_details_not_found_is_none() {
        let server = MockServer::start().await;
        let body = json!({"status_code": 34, "status_message": "not found"});
        respond(&server, "/3/movie/42", ResponseTemplate::new(404).set_body_json(body)).await;

        let details = client_for(&server).details(MediaType::Movie, 42).await;
        assert!(matches!(details, Ok(None)));
    }

    #[tokio::test]
    async fn test_details_other_status_is_api_error() {
        let server = MockServer::start().await;
        respond(&server, "/3/movie/42", ResponseTemplate::new(401)).await;

        let err = client_for(&server)
            .details(MediaType::Movie, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, TmdbError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_videos_not_found_is_error() {
        let server = MockServer::start().await;
        respond(&server, "/3/movie/42/videos", ResponseTemplate::new(404)).await;

        let err = client_for(&server)
            .videos(MediaType::Movie, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, TmdbError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_videos_parsed() {
        let server = MockServer::start().await;
        let body = json!({"id": 42, "results": [
            {"key": "abc", "site": "YouTube", "type": "Trailer"},
            {"site": "YouTube", "type": "Teaser"}
        ]});
        respond(&server, "/3/movie/42/videos", ResponseTemplate::new(200).set_body_json(body)).await;

        let videos = client_for(&server)
            .videos(MediaType::Movie, 42)
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].key, "abc");
    }
}
