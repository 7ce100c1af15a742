//! # Landing Page Document
//!
//! `index.html` carries a literal marker comment. New report links are
//! inserted right after the first occurrence of that marker, which itself
//! stays in place for the next insertion.
//!
//! Locating the marker is an explicit parse step: [`locate_marker`] either
//! hands back the document split around the marker or reports that the
//! marker is missing, in which case the document must be left untouched.

/// The insertion point literal expected in `index.html`.
pub const LINK_MARKER: &str = "<!-- LOS NUEVOS ENLACES SE INSERTARÁN AQUÍ -->";

/// Indentation placed before every inserted entry, matching the list markup.
pub const ENTRY_INDENT: &str = "            ";

/// Result of searching a document for the marker.
#[derive(Debug, PartialEq, Eq)]
pub enum MarkerSearch<'a> {
    Found(MarkerSplit<'a>),
    Missing,
}

/// A document split around the first occurrence of the marker.
#[derive(Debug, PartialEq, Eq)]
pub struct MarkerSplit<'a> {
    pub before: &'a str,
    pub marker: &'a str,
    pub after: &'a str,
}

impl MarkerSplit<'_> {
    /// Rebuilds the document with `fragment` on its own line right after the marker.
    pub fn insert_after(&self, fragment: &str) -> String {
        let inserted = 1 + ENTRY_INDENT.len() + fragment.len();
        let mut out = String::with_capacity(
            self.before.len() + self.marker.len() + inserted + self.after.len(),
        );
        out.push_str(self.before);
        out.push_str(self.marker);
        out.push('\n');
        out.push_str(ENTRY_INDENT);
        out.push_str(fragment);
        out.push_str(self.after);
        out
    }
}

/// Splits `content` around the first occurrence of `marker`.
///
/// An empty marker never matches.
pub fn locate_marker<'a>(content: &'a str, marker: &str) -> MarkerSearch<'a> {
    if marker.is_empty() {
        return MarkerSearch::Missing;
    }
    match content.find(marker) {
        Some(start) => {
            let end = start + marker.len();
            MarkerSearch::Found(MarkerSplit {
                before: &content[..start],
                marker: &content[start..end],
                after: &content[end..],
            })
        }
        None => MarkerSearch::Missing,
    }
}

/// Outcome of asking the document to take a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The full rewritten document.
    Inserted(String),
    /// No marker; the caller must not write anything back.
    MarkerMissing,
}

/// The in-memory contents of the landing page.
#[derive(Debug, Clone)]
pub struct IndexDocument {
    content: String,
}

impl IndexDocument {
    pub fn new(content: String) -> Self {
        Self { content }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn insert_entry(&self, marker: &str, fragment: &str) -> Insertion {
        match locate_marker(&self.content, marker) {
            MarkerSearch::Found(split) => Insertion::Inserted(split.insert_after(fragment)),
            MarkerSearch::Missing => Insertion::MarkerMissing,
        }
    }
}
