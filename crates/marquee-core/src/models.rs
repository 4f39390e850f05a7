mod entry;
mod patch;
mod source;

pub(crate) use entry::numeric_id;
pub use entry::{ChannelEntry, EntryKind, EntryRef, MediaEntry};
pub use patch::{ChannelPatch, EntryPatch, MediaPatch};
pub use source::{Source, SourceKind};
