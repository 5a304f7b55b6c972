pub mod assemble;
pub mod handle;
pub mod summaries;

pub use assemble::{assemble_context, render_document};
pub use handle::ContentCacheHandle;
pub use summaries::SummaryIndex;
