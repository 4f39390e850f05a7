//! In-progress edit of a single entry.
//!
//! An [`EditSession`] holds everything a form would: the target id (if
//! editing), the declared kind, the flat fields and the transient source
//! list. Human edits and metadata enrichment both write into it, and
//! [`EditSession::commit`] turns it into one catalog upsert.

use crate::catalog::{next_id, CatalogDocument};
use crate::error::MarqueeError;
use crate::form::{self, FieldSet};
use crate::models::{EntryKind, EntryPatch, EntryRef};
use crate::sources::SourceList;

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    id: Option<i64>,
    pub kind: EntryKind,
    pub fields: FieldSet,
    pub sources: SourceList,
    /// What the form showed when an existing entry was opened.
    baseline: Option<(FieldSet, SourceList)>,
}

impl EditSession {
    /// A blank form for a new entry.
    pub fn create(kind: EntryKind) -> Self {
        Self {
            id: None,
            kind,
            fields: FieldSet::default(),
            sources: SourceList::new(),
            baseline: None,
        }
    }

    /// A form pre-filled from an existing entry.
    pub fn edit(
        catalog: &CatalogDocument,
        id: i64,
        kind: EntryKind,
    ) -> Result<Self, MarqueeError> {
        let entry = catalog.get(id, kind)?;
        let sources = match entry {
            EntryRef::Media(m) => SourceList::from_sources(m.sources().unwrap_or_default()),
            EntryRef::Channel(_) => SourceList::new(),
        };
        let fields = form::to_form(entry);
        Ok(Self {
            id: Some(id),
            kind: entry.kind(),
            baseline: Some((fields.clone(), sources.clone())),
            fields,
            sources,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// The patch this session would apply.
    ///
    /// A new entry gets every field. An existing one only gets the fields
    /// that were changed since it was opened. For movies and series the
    /// source list, when set, replaces the entry's sources.
    pub fn to_patch(&self) -> EntryPatch {
        let (patch, sources_changed) = match &self.baseline {
            Some((fields, sources)) => (
                form::changed_fields(&self.fields, fields, self.kind),
                &self.sources != sources,
            ),
            None => (form::from_form(&self.fields, self.kind), true),
        };
        match patch {
            EntryPatch::Media(mut patch) => {
                if sources_changed {
                    patch.sources = Some(self.sources.as_slice().to_vec());
                }
                EntryPatch::Media(patch)
            }
            channel => channel,
        }
    }

    /// Apply the session to the catalog, returning the entry's id.
    pub fn commit(self, catalog: &mut CatalogDocument) -> Result<i64, MarqueeError> {
        let id = match self.id {
            Some(id) => id,
            None => next_id(catalog)?,
        };
        catalog.upsert(self.id, self.kind, self.to_patch())?;
        Ok(id)
    }
}
