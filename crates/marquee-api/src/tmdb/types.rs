use serde::Deserialize;

use crate::traits::{MediaDetails, Video};

// ── Details responses ───────────────────────────────────────────

/// `/movie/{id}` and `/tv/{id}` share this shape; movies use `title` and
/// `release_date`, series use `name` and `first_air_date`.
#[derive(Debug, Deserialize)]
pub struct TmdbDetails {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

// ── Videos responses ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbVideosResponse {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    pub key: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
}

// ── Conversions to shared trait types ───────────────────────────

/// Treat `""` like a missing value so fallbacks apply.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TmdbDetails {
    pub fn into_details(self) -> MediaDetails {
        MediaDetails {
            title: non_empty(self.title).or(non_empty(self.name)),
            overview: non_empty(self.overview),
            release_date: non_empty(self.release_date).or(non_empty(self.first_air_date)),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
        }
    }
}

impl TmdbVideosResponse {
    /// Videos that carry a key; entries without one cannot be linked.
    pub fn into_videos(self) -> Vec<Video> {
        self.results
            .into_iter()
            .filter_map(|v| {
                Some(Video {
                    key: v.key.filter(|k| !k.is_empty())?,
                    site: v.site.unwrap_or_default(),
                    kind: v.kind.unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_movie_details() {
        let json = r#"{
            "id": 949,
            "title": "Heat",
            "original_title": "Heat",
            "overview": "Obsessive master thief Neil McCauley...",
            "release_date": "1995-12-15",
            "poster_path": "/umSVjVdbVwtx5ryCA2QXL44Durm.jpg",
            "backdrop_path": "/zMyfPUelumio3tiDKPffaUpsQTD.jpg",
            "runtime": 170,
            "genres": [{"id": 80, "name": "Crime"}]
        }"#;

        let details: TmdbDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, Some(949));

        let details = details.into_details();
        assert_eq!(details.title.as_deref(), Some("Heat"));
        assert_eq!(details.release_date.as_deref(), Some("1995-12-15"));
        assert_eq!(
            details.poster_path.as_deref(),
            Some("/umSVjVdbVwtx5ryCA2QXL44Durm.jpg")
        );
    }

    #[test]
    fn test_deserialize_tv_details_falls_back() {
        let json = r#"{
            "id": 70523,
            "name": "Dark",
            "first_air_date": "2017-12-01",
            "overview": "",
            "poster_path": null
        }"#;

        let details: TmdbDetails = serde_json::from_str(json).unwrap();
        let details = details.into_details();
        assert_eq!(details.title.as_deref(), Some("Dark"));
        assert_eq!(details.release_date.as_deref(), Some("2017-12-01"));
        assert!(details.overview.is_none());
        assert!(details.poster_path.is_none());
        assert!(details.backdrop_path.is_none());
    }

    #[test]
    fn test_empty_release_date_uses_first_air_date() {
        let json = r#"{"title": "", "name": "Show", "release_date": "", "first_air_date": "2019-05-01"}"#;
        let details: TmdbDetails = serde_json::from_str(json).unwrap();
        let details = details.into_details();
        assert_eq!(details.title.as_deref(), Some("Show"));
        assert_eq!(details.release_date.as_deref(), Some("2019-05-01"));
    }

    #[test]
    fn test_deserialize_videos() {
        let json = r#"{
            "id": 949,
            "results": [
                {"key": "abc", "site": "YouTube", "type": "Teaser", "name": "Teaser"},
                {"key": "", "site": "YouTube", "type": "Trailer"},
                {"key": "xyz", "site": "YouTube", "type": "Trailer", "name": "Official Trailer"}
            ]
        }"#;

        let resp: TmdbVideosResponse = serde_json::from_str(json).unwrap();
        let videos = resp.into_videos();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[1].key, "xyz");
        assert_eq!(videos[1].kind, "Trailer");
    }

    #[test]
    fn test_deserialize_videos_without_results() {
        let resp: TmdbVideosResponse = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(resp.into_videos().is_empty());
    }
}
