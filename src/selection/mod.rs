pub mod budgeting;

pub use budgeting::{apply_document_cap, CapResult};
