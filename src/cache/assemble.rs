use std::collections::BTreeMap;

use crate::document::{Document, DocumentId};

const BANNER: &str = "*********************";

fn open_block(out: &mut String, id: &DocumentId) {
    out.push_str(&format!("{BANNER}DOCUMENT {id} START{BANNER}\n"));
    out.push_str(&format!("ID: {id}\n"));
    out.push_str(&format!("TYPE: {}\n", id.kind()));
}

fn close_block(out: &mut String, id: &DocumentId) {
    out.push_str(&format!("{BANNER}DOCUMENT {id} END{BANNER}\n\n\n\n"));
}

/// Renders one document as a delimited block: identity, metadata fields
/// (upper-cased names), then the full text.
pub fn render_document(doc: &Document, out: &mut String) {
    open_block(out, &doc.id);
    for (key, value) in doc.metadata.iter() {
        out.push_str(&format!("{}: {}\n", key.to_uppercase(), value));
    }
    out.push_str(&format!("TEXT: {}\n", doc.text));
    close_block(out, &doc.id);
}

/// Concatenates documents in ascending identity order, whatever order they
/// arrive in.
pub fn assemble_context<'a>(documents: impl IntoIterator<Item = &'a Document>) -> String {
    let mut sorted: Vec<&Document> = documents.into_iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut out = String::new();
    for doc in sorted {
        render_document(doc, &mut out);
    }
    out
}

pub fn render_summaries(entries: &BTreeMap<DocumentId, String>) -> String {
    let mut out = String::new();
    for (id, summary) in entries {
        open_block(&mut out, id);
        out.push_str(&format!("SUMMARY: {summary}\n"));
        close_block(&mut out, id);
    }
    out
}
