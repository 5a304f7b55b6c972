pub mod conversation;
pub mod identifiers;

pub use conversation::{ConversationHistory, Turn};
pub use identifiers::{DocumentId, DocumentIdError, DocumentKind, DocumentVersion};
