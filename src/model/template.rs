//! Header/footer template types addressed by the finalizer.

use serde::{Deserialize, Serialize};

/// Part of the page template a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePart {
    /// Page header
    Header,
    /// Page footer
    Footer,
}

/// Address of a text run inside the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunRef {
    /// Header or footer
    pub part: TemplatePart,
    /// Paragraph index within the part
    pub paragraph: usize,
    /// Run index within the paragraph
    pub run: usize,
}

/// Address of a table cell inside the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Header or footer
    pub part: TemplatePart,
    /// Table index within the part
    pub table: usize,
    /// Row index
    pub row: usize,
    /// Column index
    pub column: usize,
}

/// Dynamic page-number field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Current page number
    PageNum,
    /// Total number of pages
    NumPages,
}

/// A paragraph of the template, as a list of run texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParagraph {
    /// Texts of the runs, in order
    pub runs: Vec<String>,
}

impl TemplateParagraph {
    /// Create a paragraph from run texts.
    pub fn new<S: Into<String>>(runs: impl IntoIterator<Item = S>) -> Self {
        Self {
            runs: runs.into_iter().map(Into::into).collect(),
        }
    }
}

/// A declared page-number slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFieldSlot {
    /// Cell receiving the field
    pub cell: CellRef,
    /// Field kind
    pub kind: FieldKind,
}

/// Header/footer template of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageTemplate {
    /// Header paragraphs
    pub header: Vec<TemplateParagraph>,
    /// Footer paragraphs
    pub footer: Vec<TemplateParagraph>,
    /// Page-number slots
    pub page_fields: Vec<PageFieldSlot>,
}

impl PageTemplate {
    /// Iterate every run with its address, header first.
    pub fn runs(&self) -> impl Iterator<Item = (RunRef, &str)> {
        let header = Self::part_runs(TemplatePart::Header, &self.header);
        let footer = Self::part_runs(TemplatePart::Footer, &self.footer);
        header.chain(footer)
    }

    fn part_runs(
        part: TemplatePart,
        paragraphs: &[TemplateParagraph],
    ) -> impl Iterator<Item = (RunRef, &str)> {
        paragraphs.iter().enumerate().flat_map(move |(p, para)| {
            para.runs.iter().enumerate().map(move |(r, text)| {
                (
                    RunRef {
                        part,
                        paragraph: p,
                        run: r,
                    },
                    text.as_str(),
                )
            })
        })
    }
}
