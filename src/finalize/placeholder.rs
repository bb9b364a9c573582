//! Header/footer placeholder vocabulary.

use crate::model::DocumentAttributes;

/// Document-level placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    DocNo,
    Date,
    Rev,
    Title,
    DocName,
    Project,
    ItemType,
    StyleNo,
    DocCode,
}

impl Placeholder {
    /// Every document-level placeholder.
    pub const ALL: [Placeholder; 9] = [
        Placeholder::DocNo,
        Placeholder::Date,
        Placeholder::Rev,
        Placeholder::Title,
        Placeholder::DocName,
        Placeholder::Project,
        Placeholder::ItemType,
        Placeholder::StyleNo,
        Placeholder::DocCode,
    ];

    /// Literal text of the placeholder in the template.
    pub fn key(self) -> &'static str {
        match self {
            Placeholder::DocNo => "DOC_NO",
            Placeholder::Date => "DATE",
            Placeholder::Rev => "REV",
            Placeholder::Title => "TITLE",
            Placeholder::DocName => "DOC_NAME",
            Placeholder::Project => "PROJECT",
            Placeholder::ItemType => "ITEM_TYPE",
            Placeholder::StyleNo => "STYLE_NO",
            Placeholder::DocCode => "DOC_CODE",
        }
    }

    /// Match a run text against the vocabulary.
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == text)
    }

    /// Long free-text values are left aligned regardless of the template.
    pub fn forces_left(self) -> bool {
        matches!(
            self,
            Placeholder::Title | Placeholder::DocName | Placeholder::Project
        )
    }

    /// Value of the placeholder for a snapshot.
    pub fn value(self, attrs: &DocumentAttributes) -> String {
        match self {
            Placeholder::DocNo => attrs.document_no.clone(),
            Placeholder::Date => attrs.issue_date_text(),
            Placeholder::Rev => attrs.version.clone(),
            Placeholder::Title => attrs.title.clone(),
            Placeholder::DocName => attrs.document_name.clone(),
            Placeholder::Project => attrs.project.clone(),
            Placeholder::ItemType => attrs.item_type.clone(),
            Placeholder::StyleNo => attrs.style_no.clone(),
            Placeholder::DocCode => attrs.document_code.clone(),
        }
    }
}

/// Number of revision slots in the template's revision table.
pub const REVISION_SLOTS: usize = 3;

/// Columns of the revision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionField {
    Rev,
    Date,
    Reason,
    Point,
    Dept,
    Author,
    Approver,
    Confirmer,
}

impl RevisionField {
    const ALL: [RevisionField; 8] = [
        RevisionField::Rev,
        RevisionField::Date,
        RevisionField::Reason,
        RevisionField::Point,
        RevisionField::Dept,
        RevisionField::Author,
        RevisionField::Approver,
        RevisionField::Confirmer,
    ];

    fn prefix(self) -> &'static str {
        match self {
            RevisionField::Rev => "REV",
            RevisionField::Date => "DATE",
            RevisionField::Reason => "REASON",
            RevisionField::Point => "POINT",
            RevisionField::Dept => "DEPT",
            RevisionField::Author => "AUTHOR",
            RevisionField::Approver => "APPROVER",
            RevisionField::Confirmer => "CONFIRMER",
        }
    }

    /// Parse `"REASON2"` into `(Reason, 2)`. Slots run from 1 to 3.
    pub fn parse(text: &str) -> Option<(Self, usize)> {
        Self::ALL.into_iter().find_map(|field| {
            let slot = text.strip_prefix(field.prefix())?;
            if slot.len() != 1 {
                return None;
            }
            let slot: usize = slot.parse().ok()?;
            (1..=REVISION_SLOTS).contains(&slot).then_some((field, slot))
        })
    }

    /// Value of the field for a snapshot.
    pub fn value(self, attrs: &DocumentAttributes, labels: &RevisionLabels) -> String {
        match self {
            RevisionField::Rev => attrs.version.clone(),
            RevisionField::Date => attrs.issue_date_text(),
            RevisionField::Reason => format!("{}\n{}", labels.reason, attrs.revise_reason),
            RevisionField::Point => format!("{}\n{}", labels.point, attrs.revise_point),
            RevisionField::Dept => attrs.department.clone(),
            RevisionField::Author => attrs.author.clone(),
            RevisionField::Approver => attrs.approver.clone(),
            RevisionField::Confirmer => attrs.confirmer.clone(),
        }
    }
}

/// Labels printed above revision reason and point text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionLabels {
    /// Label of the reason cell
    pub reason: String,
    /// Label of the point cell
    pub point: String,
}

impl Default for RevisionLabels {
    fn default() -> Self {
        Self {
            reason: "Reason:".to_string(),
            point: "Point:".to_string(),
        }
    }
}
