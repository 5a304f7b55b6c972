pub mod metadata;
pub mod document;

pub use crate::types::identifiers::{DocumentId, DocumentKind, DocumentVersion};
pub use metadata::{Metadata, MetadataValue};
pub use document::{Document, DocumentError};
