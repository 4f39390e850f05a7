//! The in-memory catalog document and its CRUD contract.
//!
//! A [`CatalogDocument`] is owned by a single editing session. Entries are
//! only created, changed or removed through [`CatalogDocument::upsert`] and
//! [`CatalogDocument::delete`]. Everything else in the document, including
//! its key order, is written back the way it was read.

use std::io::Read;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::MarqueeError;
use crate::models::{numeric_id, ChannelEntry, EntryKind, EntryPatch, EntryRef, MediaEntry};

/// Path that stands for standard input in [`CatalogDocument::read_from`].
pub const STDIN_PATH: &str = "-";

const MOVIES: &str = "movies";
const CHANNELS: &str = "channels";

/// Root of a catalog: a `movies` and a `channels` collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDocument {
    movies: Vec<MediaEntry>,
    channels: Vec<ChannelEntry>,
    /// Top-level attributes in document order. The collections keep a
    /// placeholder here that marks their position.
    root: Map<String, Value>,
}

impl CatalogDocument {
    /// Parse a catalog from JSON text. Missing or `null` collections
    /// become empty.
    pub fn load(text: &str) -> Result<Self, MarqueeError> {
        if text.trim().is_empty() {
            return Err(MarqueeError::Parse("document is empty".into()));
        }
        let Value::Object(mut root) = serde_json::from_str::<Value>(text)? else {
            return Err(MarqueeError::Parse("top level must be a JSON object".into()));
        };
        let movies = take_collection(&mut root, MOVIES)?
            .into_iter()
            .map(MediaEntry::from)
            .collect();
        let channels = take_collection(&mut root, CHANNELS)?
            .into_iter()
            .map(ChannelEntry::from)
            .collect();
        let doc = Self {
            movies,
            channels,
            root,
        };
        debug!(
            movies = doc.movies.len(),
            channels = doc.channels.len(),
            "Loaded catalog"
        );
        Ok(doc)
    }

    /// Read and parse a catalog file, or standard input for `-`.
    pub fn read_from(path: &Path) -> Result<Self, MarqueeError> {
        let text = if path.as_os_str() == STDIN_PATH {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(path)?
        };
        Self::load(&text)
    }

    /// Pretty-printed JSON of the whole document.
    pub fn serialize(&self) -> Result<String, MarqueeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize and write the document to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), MarqueeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialize()?)?;
        info!(path = %path.display(), "Exported catalog");
        Ok(())
    }

    pub fn movies(&self) -> &[MediaEntry] {
        &self.movies
    }

    pub fn channels(&self) -> &[ChannelEntry] {
        &self.channels
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Every entry tagged with its resolved kind, ordered by ascending id.
    /// Entries without a numeric id sort last.
    pub fn list(&self) -> Vec<(EntryRef<'_>, EntryKind)> {
        let mut all: Vec<(EntryRef<'_>, EntryKind)> = self
            .movies
            .iter()
            .map(|m| (EntryRef::Media(m), m.resolved_kind()))
            .chain(
                self.channels
                    .iter()
                    .map(|c| (EntryRef::Channel(c), EntryKind::Channel)),
            )
            .collect();
        all.sort_by_key(|(entry, _)| {
            let id = entry.get("id").and_then(numeric_id);
            (id.is_none(), id)
        });
        all
    }

    /// Look up an entry. Movies and series share a collection, so either
    /// media kind finds any entry in `movies`.
    pub fn get(&self, id: i64, kind: EntryKind) -> Result<EntryRef<'_>, MarqueeError> {
        let found = if kind.is_media() {
            self.movies.iter().find(|m| m.has_id(id)).map(EntryRef::Media)
        } else {
            self.channels
                .iter()
                .find(|c| c.has_id(id))
                .map(EntryRef::Channel)
        };
        found.ok_or(MarqueeError::NotFound { id, kind })
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Update the entry with `id`, or create a new one when `id` is `None`.
    pub fn upsert(
        &mut self,
        id: Option<i64>,
        kind: EntryKind,
        patch: EntryPatch,
    ) -> Result<EntryRef<'_>, MarqueeError> {
        match (kind.is_media(), patch) {
            (true, EntryPatch::Media(mut patch)) => {
                let entry = match id {
                    Some(id) => {
                        let entry = self
                            .movies
                            .iter_mut()
                            .find(|m| m.has_id(id))
                            .ok_or(MarqueeError::NotFound { id, kind })?;
                        patch.kind = (entry.kind() != Some(kind)).then_some(kind);
                        patch.apply(entry);
                        info!(id, %kind, "Updated entry");
                        entry
                    }
                    None => {
                        let id = next_id(self)?;
                        let mut entry = MediaEntry::new(id);
                        patch.kind = Some(kind);
                        patch.apply(&mut entry);
                        entry.seed_defaults();
                        info!(id, %kind, "Created entry");
                        let index = self.movies.len();
                        self.movies.push(entry);
                        &mut self.movies[index]
                    }
                };
                Ok(EntryRef::Media(entry))
            }
            (false, EntryPatch::Channel(patch)) => {
                let entry = match id {
                    Some(id) => {
                        let entry = self
                            .channels
                            .iter_mut()
                            .find(|c| c.has_id(id))
                            .ok_or(MarqueeError::NotFound { id, kind })?;
                        patch.apply(entry);
                        info!(id, %kind, "Updated entry");
                        entry
                    }
                    None => {
                        let id = next_id(self)?;
                        let mut entry = ChannelEntry::new(id);
                        patch.apply(&mut entry);
                        entry.seed_defaults();
                        info!(id, %kind, "Created entry");
                        let index = self.channels.len();
                        self.channels.push(entry);
                        &mut self.channels[index]
                    }
                };
                Ok(EntryRef::Channel(entry))
            }
            (_, patch) => Err(MarqueeError::KindMismatch {
                kind,
                patch: patch.target(),
            }),
        }
    }

    /// Remove an entry. The caller is responsible for having the user
    /// confirm the deletion first.
    pub fn delete(&mut self, id: i64, kind: EntryKind) -> Result<(), MarqueeError> {
        if kind.is_media() {
            let index = self
                .movies
                .iter()
                .position(|m| m.has_id(id))
                .ok_or(MarqueeError::NotFound { id, kind })?;
            self.movies.remove(index);
        } else {
            let index = self
                .channels
                .iter()
                .position(|c| c.has_id(id))
                .ok_or(MarqueeError::NotFound { id, kind })?;
            self.channels.remove(index);
        }
        info!(id, %kind, "Deleted entry");
        Ok(())
    }
}

impl Serialize for CatalogDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.root {
            match key.as_str() {
                MOVIES => map.serialize_entry(key, &self.movies)?,
                CHANNELS => map.serialize_entry(key, &self.channels)?,
                _ => map.serialize_entry(key, value)?,
            }
        }
        if !self.root.contains_key(MOVIES) {
            map.serialize_entry(MOVIES, &self.movies)?;
        }
        if !self.root.contains_key(CHANNELS) {
            map.serialize_entry(CHANNELS, &self.channels)?;
        }
        map.end()
    }
}

/// Next free id across both collections: `max + 1`, or `1` when there are
/// no numeric ids.
///
/// Recomputed on every call; there is no cached counter.
pub fn next_id(doc: &CatalogDocument) -> Result<i64, MarqueeError> {
    let max = doc
        .movies
        .iter()
        .filter_map(|m| m.get("id"))
        .chain(doc.channels.iter().filter_map(|c| c.get("id")))
        .filter_map(numeric_id)
        .max();
    match max {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .and_then(|next| i64::try_from(next).ok())
            .ok_or(MarqueeError::IdsExhausted { max }),
    }
}

/// Move a collection's entries out of `root`, leaving `null` in its slot.
fn take_collection(
    root: &mut Map<String, Value>,
    key: &str,
) -> Result<Vec<Map<String, Value>>, MarqueeError> {
    let Some(slot) = root.get_mut(key) else {
        return Ok(Vec::new());
    };
    match slot.take() {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(attrs) => Ok(attrs),
                other => Err(MarqueeError::Parse(format!(
                    "`{key}` entries must be objects, found {other}"
                ))),
            })
            .collect(),
        other => Err(MarqueeError::Parse(format!(
            "`{key}` must be a list, found {other}"
        ))),
    }
}
