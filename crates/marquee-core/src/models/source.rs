use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Playback kind of a source. Unrecognised values are carried through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Video,
    Live,
    Other(String),
}

impl SourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Video => "video",
            Self::Live => "live",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for SourceKind {
    fn from(s: &str) -> Self {
        match s {
            "video" => Self::Video,
            "live" => Self::Live,
            _ => Self::Other(s.to_string()),
        }
    }
}

/// A playback URL attached to an entry, optionally named.
///
/// Stored as the raw JSON element so attributes the editor does not know
/// about (and elements of an unexpected shape) are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source {
    value: Value,
}

impl Source {
    pub fn video(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            value: json!({"title": title.into(), "url": url.into(), "type": "video"}),
        }
    }

    pub fn live(url: impl Into<String>) -> Self {
        Self {
            value: json!({"type": "live", "url": url.into()}),
        }
    }

    /// The source's url, or `""` when it has none.
    pub fn url(&self) -> &str {
        self.value.get("url").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.value.get("title").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<SourceKind> {
        self.value
            .get("type")
            .or_else(|| self.value.get("kind"))
            .and_then(Value::as_str)
            .map(SourceKind::from)
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Self { value }
    }
}
