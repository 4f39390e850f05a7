use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::source::Source;

/// Collection-valued attributes seeded on a new movie or series.
const MEDIA_DEFAULT_LISTS: &[&str] = &["sources", "genres", "actors", "subtitles", "comments"];

/// Collection-valued attributes seeded on a new channel, after its `type`.
const CHANNEL_DEFAULT_LISTS: &[&str] = &["categories", "countries", "comments"];

/// What a catalog entry is. Written as the entry's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Movie,
    Series,
    Channel,
}

impl EntryKind {
    pub const ALL: &[EntryKind] = &[Self::Movie, Self::Series, Self::Channel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Channel => "channel",
        }
    }

    /// Movies and series live in the `movies` collection.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Movie | Self::Series)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" | "tv" => Ok(Self::Series),
            "channel" => Ok(Self::Channel),
            other => Err(format!("unknown entry kind '{other}'")),
        }
    }
}

/// Numeric value of an `id` attribute.
///
/// Integers, whole floats and numeric strings all compare as numbers;
/// anything else is not an id.
pub(crate) fn numeric_id(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 1e30)
                    .map(|f| f as i128)
            }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A movie or series in the `movies` collection.
///
/// The entry is kept as its JSON object: attribute order, `null`s and
/// values of unexpected types survive a load and export untouched. The
/// accessors below read the attributes the editor works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaEntry {
    attrs: Map<String, Value>,
}

impl MediaEntry {
    /// An entry holding only its id. Creation fills in the rest.
    pub(crate) fn new(id: i64) -> Self {
        Self {
            attrs: id_only(id),
        }
    }

    /// Seed the default empty collections that are still missing.
    pub(crate) fn seed_defaults(&mut self) {
        seed_lists(&mut self.attrs, MEDIA_DEFAULT_LISTS);
    }

    pub fn id(&self) -> Option<i64> {
        entry_id(&self.attrs)
    }

    pub fn has_id(&self, id: i64) -> bool {
        has_id(&self.attrs, id)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// The declared kind, if the entry carries a recognised one.
    pub fn kind(&self) -> Option<EntryKind> {
        declared_kind(&self.attrs)
    }

    /// `series` when tagged as such or when the entry carries `seasons`.
    pub fn resolved_kind(&self) -> EntryKind {
        match self.kind() {
            Some(EntryKind::Series) => EntryKind::Series,
            _ if self.attrs.contains_key("seasons") => EntryKind::Series,
            _ => EntryKind::Movie,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.attrs.get("title").and_then(Value::as_str)
    }

    pub fn trailer_url(&self) -> Option<&str> {
        self.attrs
            .get("trailer")
            .and_then(|t| t.get("url"))
            .and_then(Value::as_str)
    }

    /// The entry's sources, when `sources` is a list.
    pub fn sources(&self) -> Option<Vec<Source>> {
        sources(&self.attrs)
    }

    pub(crate) fn set_kind(&mut self, kind: EntryKind) {
        set_kind(&mut self.attrs, kind);
    }

    /// Write one attribute. An existing attribute keeps its position; a
    /// new one goes at the end.
    pub(crate) fn set(&mut self, key: &str, value: Value) {
        self.attrs.insert(key.to_string(), value);
    }
}

impl From<Map<String, Value>> for MediaEntry {
    fn from(attrs: Map<String, Value>) -> Self {
        Self { attrs }
    }
}

/// A live channel in the `channels` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelEntry {
    attrs: Map<String, Value>,
}

impl ChannelEntry {
    pub(crate) fn new(id: i64) -> Self {
        Self {
            attrs: id_only(id),
        }
    }

    /// Seed `sources`, the `channel` type and the default empty collections.
    pub(crate) fn seed_defaults(&mut self) {
        seed_lists(&mut self.attrs, &["sources"]);
        if declared_kind(&self.attrs).is_none() {
            set_kind(&mut self.attrs, EntryKind::Channel);
        }
        seed_lists(&mut self.attrs, CHANNEL_DEFAULT_LISTS);
    }

    pub fn id(&self) -> Option<i64> {
        entry_id(&self.attrs)
    }

    pub fn has_id(&self, id: i64) -> bool {
        has_id(&self.attrs, id)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.attrs.get("title").and_then(Value::as_str)
    }

    pub fn sources(&self) -> Option<Vec<Source>> {
        sources(&self.attrs)
    }

    /// The channel's stream: the url of its first source.
    pub fn stream_url(&self) -> Option<&str> {
        self.attrs
            .get("sources")
            .and_then(Value::as_array)
            .and_then(|s| s.first())
            .and_then(|s| s.get("url"))
            .and_then(Value::as_str)
    }

    pub(crate) fn set(&mut self, key: &str, value: Value) {
        self.attrs.insert(key.to_string(), value);
    }
}

impl From<Map<String, Value>> for ChannelEntry {
    fn from(attrs: Map<String, Value>) -> Self {
        Self { attrs }
    }
}

/// A borrowed entry from either collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntryRef<'a> {
    Media(&'a MediaEntry),
    Channel(&'a ChannelEntry),
}

impl<'a> EntryRef<'a> {
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Media(m) => m.id(),
            Self::Channel(c) => c.id(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self {
            Self::Media(m) => m.attrs.get(key),
            Self::Channel(c) => c.attrs.get(key),
        }
    }

    pub fn title(&self) -> Option<&'a str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Media(m) => m.resolved_kind(),
            Self::Channel(_) => EntryKind::Channel,
        }
    }
}

fn id_only(id: i64) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("id".into(), Value::from(id));
    attrs
}

fn entry_id(attrs: &Map<String, Value>) -> Option<i64> {
    attrs
        .get("id")
        .and_then(numeric_id)
        .and_then(|id| i64::try_from(id).ok())
}

fn has_id(attrs: &Map<String, Value>, id: i64) -> bool {
    attrs.get("id").and_then(numeric_id) == Some(i128::from(id))
}

fn declared_kind(attrs: &Map<String, Value>) -> Option<EntryKind> {
    attrs
        .get("type")
        .or_else(|| attrs.get("kind"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// Write the kind under `type`, or under `kind` for entries that already
/// use that name.
fn set_kind(attrs: &mut Map<String, Value>, kind: EntryKind) {
    let key = if !attrs.contains_key("type") && attrs.contains_key("kind") {
        "kind"
    } else {
        "type"
    };
    attrs.insert(key.into(), Value::from(kind.as_str()));
}

fn sources(attrs: &Map<String, Value>) -> Option<Vec<Source>> {
    attrs
        .get("sources")
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(Source::from).collect())
}

fn seed_lists(attrs: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if !attrs.contains_key(*key) {
            attrs.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }
}
