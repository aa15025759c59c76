//! Drag payloads, keyed by mime type.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_URI_LIST: &str = "text/uri-list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadData {
    Text(String),
    Bytes(Vec<u8>),
}

/// Data carried by a drag, one entry per offered mime type, in offer order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payload {
    entries: IndexMap<String, PayloadData>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, mime: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(mime, PayloadData::Text(text.into()));
        self
    }

    pub fn with_bytes(mut self, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(mime, PayloadData::Bytes(bytes));
        self
    }

    pub fn insert(&mut self, mime: impl Into<String>, data: PayloadData) {
        self.entries.insert(mime.into(), data);
    }

    #[inline]
    pub fn get(&self, mime: &str) -> Option<&PayloadData> {
        self.entries.get(mime)
    }

    #[inline]
    pub fn contains(&self, mime: &str) -> bool {
        self.entries.contains_key(mime)
    }

    /// True when any of `mimes` is offered.
    pub fn contains_any<'a>(&self, mimes: impl IntoIterator<Item = &'a str>) -> bool {
        mimes.into_iter().any(|m| self.contains(m))
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the uri list carries at least one `file://` entry.
    pub fn contains_filepaths(&self) -> bool {
        self.uri_lines().any(|line| line.starts_with("file://"))
    }

    /// Local file paths from the uri list, percent-decoded. Non-file URIs and
    /// lines that fail to decode are skipped.
    pub fn filepaths(&self) -> Vec<PathBuf> {
        self.uri_lines()
            .filter_map(|line| line.strip_prefix("file://"))
            .filter_map(|path| urlencoding::decode(path).ok())
            .map(|path| PathBuf::from(path.into_owned()))
            .collect()
    }

    fn uri_lines(&self) -> impl Iterator<Item = &str> {
        let text = match self.get(MIME_URI_LIST) {
            Some(PayloadData::Text(t)) => t.as_str(),
            _ => "",
        };
        text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filepaths_decode_and_skip_non_files() {
        let p = Payload::new().with_text(
            MIME_URI_LIST,
            "# comment\nfile:///tmp/a%20b.txt\r\nhttps://example.com/x\nfile:///etc/hosts\n",
        );
        assert!(p.contains_filepaths());
        assert_eq!(
            p.filepaths(),
            vec![PathBuf::from("/tmp/a b.txt"), PathBuf::from("/etc/hosts")]
        );
    }

    #[test]
    fn test_contains_any_keeps_offer_order() {
        let p = Payload::new().with_text("b/b", "1").with_bytes("a/a", vec![1, 2]);
        assert!(p.contains_any(["x/x", "a/a"]));
        assert!(!p.contains_any(["x/x"]));
        assert_eq!(p.mime_types().collect::<Vec<_>>(), vec!["b/b", "a/a"]);
        assert!(!p.contains_filepaths());
    }
}
