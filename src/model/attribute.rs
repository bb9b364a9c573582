//! Document attributes, revision history and references.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One revision snapshot of a document's attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentAttributes {
    /// Document number
    pub document_no: String,

    /// Document title
    pub title: String,

    /// Document name
    pub document_name: String,

    /// Project name
    pub project: String,

    /// Item type
    pub item_type: String,

    /// Style number
    pub style_no: String,

    /// Document code
    pub document_code: String,

    /// Revision label, e.g. `"A1"`
    pub version: String,

    /// Issue date of this revision
    pub issue_date: Option<NaiveDate>,

    /// Why the revision was made
    pub revise_reason: String,

    /// What the revision changed
    pub revise_point: String,

    /// Owning department
    pub department: String,

    /// Author
    pub author: String,

    /// Approver
    pub approver: String,

    /// Confirmer
    pub confirmer: String,

    /// Text of attribute-sourced steps, keyed by source code
    pub sections: BTreeMap<String, String>,
}

impl DocumentAttributes {
    /// Get a section value, `None` if missing or blank.
    pub fn section(&self, key: &str) -> Option<&str> {
        self.sections
            .get(key)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Issue date formatted as `YYYY-MM-DD`, empty when unset.
    pub fn issue_date_text(&self) -> String {
        self.issue_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Ordered revision snapshots, oldest first. The last entry is current.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeHistory {
    entries: Vec<DocumentAttributes>,
}

impl AttributeHistory {
    /// Create a history from snapshots ordered oldest first.
    pub fn new(entries: Vec<DocumentAttributes>) -> Self {
        Self { entries }
    }

    /// Append a newer snapshot.
    pub fn push(&mut self, entry: DocumentAttributes) {
        self.entries.push(entry);
    }

    /// The current snapshot.
    pub fn current(&self) -> Option<&DocumentAttributes> {
        self.entries.last()
    }

    /// Up to `count` most recent snapshots, oldest first.
    pub fn recent(&self, count: usize) -> &[DocumentAttributes] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no snapshots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate snapshots oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentAttributes> {
        self.entries.iter()
    }
}

/// Reference category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReferenceType {
    /// Referenced documents (type 0)
    Document,
    /// Referenced forms (type 1)
    Form,
}

impl TryFrom<u8> for ReferenceType {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ReferenceType::Document),
            1 => Ok(ReferenceType::Form),
            other => Err(format!("unknown reference type {}", other)),
        }
    }
}

impl From<ReferenceType> for u8 {
    fn from(value: ReferenceType) -> Self {
        match value {
            ReferenceType::Document => 0,
            ReferenceType::Form => 1,
        }
    }
}

/// A referenced document or form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Reference category
    pub reference_type: ReferenceType,
    /// Identifier (document number)
    pub id: String,
    /// Display name
    pub name: String,
}

impl Reference {
    /// Create a reference.
    pub fn new(reference_type: ReferenceType, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            reference_type,
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(version: &str) -> DocumentAttributes {
        DocumentAttributes {
            version: version.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_recent_oldest_first() {
        let history = AttributeHistory::new(vec![
            snapshot("A0"),
            snapshot("A1"),
            snapshot("A2"),
            snapshot("A3"),
        ]);
        let recent: Vec<_> = history.recent(3).iter().map(|a| a.version.as_str()).collect();
        assert_eq!(recent, vec!["A1", "A2", "A3"]);
        assert_eq!(history.current().map(|a| a.version.as_str()), Some("A3"));
        assert_eq!(history.recent(10).len(), 4);
    }

    #[test]
    fn test_section_blank_is_none() {
        let mut attrs = DocumentAttributes::default();
        attrs.sections.insert("purpose".into(), "  ".into());
        attrs.sections.insert("scope".into(), "Line 3".into());
        assert_eq!(attrs.section("purpose"), None);
        assert_eq!(attrs.section("scope"), Some("Line 3"));
    }

    #[test]
    fn test_reference_type_serde() {
        let r: Reference =
            serde_json::from_str(r#"{"referenceType": 1, "id": "F-01", "name": "Checklist"}"#)
                .unwrap();
        assert_eq!(r.reference_type, ReferenceType::Form);
        assert!(serde_json::from_str::<Reference>(
            r#"{"referenceType": 7, "id": "x", "name": "y"}"#
        )
        .is_err());
    }

    #[test]
    fn test_issue_date_text() {
        let attrs = DocumentAttributes {
            issue_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..Default::default()
        };
        assert_eq!(attrs.issue_date_text(), "2024-03-09");
        assert_eq!(DocumentAttributes::default().issue_date_text(), "");
    }
}
