//! Flat editable fields and their mapping to and from catalog entries.

use serde_json::{Number, Value};

use crate::models::{ChannelPatch, EntryKind, EntryPatch, EntryRef, MediaPatch, Source};

/// The editable fields of an entry, all as plain text.
///
/// `rating` and `stream_url` only apply to channels; `year`, `cover` and
/// `trailer_url` only to movies and series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub title: String,
    pub year: String,
    pub description: String,
    pub image: String,
    pub cover: String,
    pub trailer_url: String,
    pub rating: String,
    pub stream_url: String,
}

/// Project an entry into form fields. Missing attributes, and attributes
/// that are neither text nor a number, become empty.
pub fn to_form(entry: EntryRef<'_>) -> FieldSet {
    let text = |key: &str| display_text(entry.get(key));
    match entry {
        EntryRef::Media(m) => FieldSet {
            title: text("title"),
            year: text("year"),
            description: text("description"),
            image: text("image"),
            cover: text("cover"),
            trailer_url: m.trailer_url().unwrap_or_default().to_string(),
            ..Default::default()
        },
        EntryRef::Channel(c) => FieldSet {
            title: text("title"),
            description: text("description"),
            image: text("image"),
            rating: text("rating"),
            stream_url: c.stream_url().unwrap_or_default().to_string(),
            ..Default::default()
        },
    }
}

/// Extract a patch from form fields.
///
/// Every field the form shows for `kind` is set on the patch. Media
/// `sources` are left unset: they come from the session's source list.
pub fn from_form(fields: &FieldSet, kind: EntryKind) -> EntryPatch {
    if kind.is_media() {
        let trailer_url = fields.trailer_url.trim();
        EntryPatch::Media(MediaPatch {
            kind: None,
            title: Some(fields.title.clone()),
            year: Some(fields.year.clone()),
            description: Some(fields.description.clone()),
            image: Some(fields.image.clone()),
            cover: Some(fields.cover.clone()),
            trailer: Some((!trailer_url.is_empty()).then(|| trailer_url.to_string())),
            sources: None,
        })
    } else {
        let stream_url = fields.stream_url.trim();
        let sources = if stream_url.is_empty() {
            Vec::new()
        } else {
            vec![Source::live(stream_url)]
        };
        EntryPatch::Channel(ChannelPatch {
            title: Some(fields.title.clone()),
            image: Some(fields.image.clone()),
            rating: Some(parse_rating(&fields.rating)),
            description: Some(fields.description.clone()),
            sources: Some(sources),
        })
    }
}

/// Like [`from_form`], but only the fields that differ from `baseline`
/// are set. Attributes the user left alone are never rewritten.
pub fn changed_fields(fields: &FieldSet, baseline: &FieldSet, kind: EntryKind) -> EntryPatch {
    let mut patch = from_form(fields, kind);
    match &mut patch {
        EntryPatch::Media(p) => {
            keep_if(&mut p.title, fields.title != baseline.title);
            keep_if(&mut p.year, fields.year != baseline.year);
            keep_if(&mut p.description, fields.description != baseline.description);
            keep_if(&mut p.image, fields.image != baseline.image);
            keep_if(&mut p.cover, fields.cover != baseline.cover);
            keep_if(&mut p.trailer, fields.trailer_url != baseline.trailer_url);
        }
        EntryPatch::Channel(p) => {
            keep_if(&mut p.title, fields.title != baseline.title);
            keep_if(&mut p.image, fields.image != baseline.image);
            keep_if(&mut p.rating, fields.rating != baseline.rating);
            keep_if(&mut p.description, fields.description != baseline.description);
            keep_if(&mut p.sources, fields.stream_url != baseline.stream_url);
        }
    }
    patch
}

fn keep_if<T>(field: &mut Option<T>, changed: bool) {
    if !changed {
        *field = None;
    }
}

fn display_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Parse a rating, falling back to `0`. Whole values stay integers.
fn parse_rating(text: &str) -> Number {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
            Number::from(v as i64)
        }
        Ok(v) => Number::from_f64(v).unwrap_or_else(|| Number::from(0)),
        Err(_) => Number::from(0),
    }
}
