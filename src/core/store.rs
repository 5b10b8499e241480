//! The widget store — a single JSON document mapping widget names to
//! their row strings.
//!
//! The document on disk is the sole source of truth; everything loaded
//! into memory is a working draft until [`save`] writes it back.  Names
//! keep their insertion order, which is also the order `list` reports —
//! a plain `HashMap` would shuffle it, so the document carries its own
//! ordered entry list and (de)serialises as a flat JSON object.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{Error, Result};
use super::widget::{Widget, WidgetInfo};

/// File name of the backing document inside a store directory.
pub const STORE_FILE: &str = "widgets.json";

// ───────────────────────────────────────── document ──────────

/// Insertion-ordered mapping from widget name to widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetDocument {
    entries: Vec<(String, Widget)>,
}

impl WidgetDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Widget names in store order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Result<&Widget> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| w)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Widget> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, w)| w)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Insert or silently overwrite.  An overwritten entry keeps its
    /// position; a new name is appended.  The name itself is the only
    /// thing validated — `-` is reserved as the command delimiter.
    pub fn put(&mut self, name: &str, widget: Widget) -> Result<()> {
        if name.contains('-') {
            return Err(Error::BadName(name.to_string()));
        }
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = widget,
            None => self.entries.push((name.to_string(), widget)),
        }
        Ok(())
    }

    /// Remove every named widget, or none of them: if any name is absent
    /// the call fails and the document is byte-identical to before.
    pub fn delete<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for name in names {
            if !self.contains(name.as_ref()) {
                return Err(Error::NotFound(name.as_ref().to_string()));
            }
        }
        self.entries
            .retain(|(n, _)| !names.iter().any(|d| d.as_ref() == n));
        Ok(())
    }

    /// Derived attributes of one stored widget.
    pub fn info(&self, name: &str) -> Result<WidgetInfo> {
        Ok(self.get(name)?.info(name))
    }
}

// The JSON shape is `{"name": ["row", …], …}` — a map, not a list of
// pairs — so ordering has to go through a hand-written map visitor.

impl Serialize for WidgetDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, widget) in &self.entries {
            map.serialize_entry(name, widget)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WidgetDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DocVisitor;

        impl<'de> Visitor<'de> for DocVisitor {
            type Value = WidgetDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of widget name to row strings")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut doc = WidgetDocument {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((name, widget)) = access.next_entry::<String, Widget>()? {
                    // Duplicate keys in the file: last one wins.
                    match doc.entries.iter_mut().find(|(n, _)| *n == name) {
                        Some((_, existing)) => *existing = widget,
                        None => doc.entries.push((name, widget)),
                    }
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocVisitor)
    }
}

// ───────────────────────────────────────── load / save ───────

/// Resolve a store location to the document path.  A directory means
/// `<dir>/widgets.json`; anything else is taken as the file itself.
pub fn document_path(location: &Path) -> PathBuf {
    if location.is_dir() {
        location.join(STORE_FILE)
    } else {
        location.to_path_buf()
    }
}

/// Load the document at `location`.
///
/// A missing file is not an error: an empty store is created on disk and
/// returned, with a warning.  A file that exists but fails to parse is
/// fatal to this call — there is no document to operate on.
pub fn load(location: &Path) -> Result<WidgetDocument> {
    let path = document_path(location);
    if !path.exists() {
        tracing::warn!(path = %path.display(), "widget store not found, creating a new one");
        let doc = WidgetDocument::new();
        save(&doc, location)?;
        return Ok(doc);
    }
    let contents = std::fs::read_to_string(&path)?;
    let doc = serde_json::from_str(&contents)?;
    Ok(doc)
}

/// Serialise the full document, overwriting the previous content.  The
/// only operation that touches the durable file.
pub fn save(doc: &WidgetDocument, location: &Path) -> Result<()> {
    let path = document_path(location);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_json::to_string(doc)?;
    std::fs::write(&path, contents)?;
    tracing::debug!(path = %path.display(), widgets = doc.len(), "saved widget store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(rows: &[&str]) -> Widget {
        Widget::new(rows.iter().map(|s| s.to_string()).collect())
    }

    fn sample() -> WidgetDocument {
        let mut doc = WidgetDocument::new();
        doc.put("zebra", widget(&["zz", "zz"])).unwrap();
        doc.put("apple", widget(&["a"])).unwrap();
        doc.put("mango", widget(&["mmm"])).unwrap();
        doc
    }

    #[test]
    fn names_keep_insertion_order() {
        let doc = sample();
        let names: Vec<&str> = doc.names().collect();
        assert_eq!(names, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn put_overwrites_in_place() {
        let mut doc = sample();
        doc.put("apple", widget(&["A", "A"])).unwrap();
        assert_eq!(doc.names().collect::<Vec<_>>(), vec!["zebra", "apple", "mango"]);
        assert_eq!(doc.get("apple").unwrap().height(), 2);
    }

    #[test]
    fn names_with_the_delimiter_are_rejected() {
        let mut doc = WidgetDocument::new();
        assert!(matches!(
            doc.put("not-allowed", widget(&["x"])),
            Err(Error::BadName(_))
        ));
        assert!(doc.is_empty());
    }

    #[test]
    fn get_missing_is_not_found() {
        assert!(matches!(sample().get("ghost"), Err(Error::NotFound(_))));
    }

    #[test]
    fn delete_is_all_or_nothing() {
        let mut doc = sample();
        let before = doc.clone();
        let err = doc.delete(&["apple", "ghost"]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(doc, before);

        doc.delete(&["apple", "zebra"]).unwrap();
        assert_eq!(doc.names().collect::<Vec<_>>(), vec!["mango"]);
    }

    #[test]
    fn json_round_trip_preserves_order_and_lines() {
        let doc = sample();
        let json = serde_json::to_string(&doc).unwrap();
        let back: WidgetDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let doc = sample();
        save(&doc, dir.path()).unwrap();
        let back = load(dir.path()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn missing_store_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load(dir.path()).unwrap();
        assert!(doc.is_empty());
        assert!(dir.path().join(STORE_FILE).exists());
    }

    #[test]
    fn malformed_store_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "{not json").unwrap();
        assert!(matches!(load(dir.path()), Err(Error::Malformed(_))));
    }

    #[test]
    fn info_reports_derived_attributes() {
        let doc = sample();
        let info = doc.info("zebra").unwrap();
        assert_eq!(info.shape, (2, 2));
        assert_eq!(info.size, 4);
        assert!(info.is_proper);
    }
}
