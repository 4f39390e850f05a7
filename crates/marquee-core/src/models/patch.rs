use serde_json::{json, Number, Value};

use super::entry::{ChannelEntry, EntryKind, MediaEntry};
use super::source::Source;

/// Partial field values for an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryPatch {
    Media(MediaPatch),
    Channel(ChannelPatch),
}

impl EntryPatch {
    pub fn target(&self) -> &'static str {
        match self {
            Self::Media(_) => "movie/series",
            Self::Channel(_) => "channel",
        }
    }
}

/// Field values for a movie or series. `None` leaves the entry's value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPatch {
    pub kind: Option<EntryKind>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub cover: Option<String>,
    /// Trailer url. `Some(None)` writes an explicit `null`.
    pub trailer: Option<Option<String>>,
    pub sources: Option<Vec<Source>>,
}

impl MediaPatch {
    /// Shallow merge, new over old. Attributes the entry already has keep
    /// their position; new ones are appended in field order.
    pub fn apply(self, entry: &mut MediaEntry) {
        if let Some(kind) = self.kind {
            entry.set_kind(kind);
        }
        let texts = [
            ("title", self.title),
            ("year", self.year),
            ("description", self.description),
            ("image", self.image),
            ("cover", self.cover),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                entry.set(key, Value::String(value));
            }
        }
        if let Some(trailer) = self.trailer {
            let value = trailer.map_or(Value::Null, |url| json!({ "url": url }));
            entry.set("trailer", value);
        }
        if let Some(sources) = self.sources {
            entry.set("sources", sources_value(sources));
        }
    }
}

/// Field values for a channel. `None` leaves the entry's value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPatch {
    pub title: Option<String>,
    pub image: Option<String>,
    pub rating: Option<Number>,
    pub description: Option<String>,
    pub sources: Option<Vec<Source>>,
}

impl ChannelPatch {
    /// Shallow merge, new over old, keeping attribute positions.
    pub fn apply(self, entry: &mut ChannelEntry) {
        if let Some(title) = self.title {
            entry.set("title", Value::String(title));
        }
        if let Some(image) = self.image {
            entry.set("image", Value::String(image));
        }
        if let Some(rating) = self.rating {
            entry.set("rating", Value::Number(rating));
        }
        if let Some(description) = self.description {
            entry.set("description", Value::String(description));
        }
        if let Some(sources) = self.sources {
            entry.set("sources", sources_value(sources));
        }
    }
}

fn sources_value(sources: Vec<Source>) -> Value {
    Value::Array(sources.into_iter().map(Source::into_value).collect())
}
