//! Render commands consumed by the document package writer.

use serde::{Deserialize, Serialize};

use crate::model::{CellRef, FieldKind, MarkColor, RunRef};

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

/// Vertical alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top alignment
    #[default]
    Top,
    /// Middle/center alignment
    Middle,
    /// Bottom alignment
    Bottom,
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Text color
    #[serde(default)]
    pub color: MarkColor,

    /// Underlined text
    #[serde(default)]
    pub underline: bool,

    /// Bold text
    #[serde(default)]
    pub bold: bool,
}

impl Run {
    /// Create a plain black run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: MarkColor::Black,
            underline: false,
            bold: false,
        }
    }

    /// Create a colored run.
    pub fn colored(text: impl Into<String>, color: MarkColor) -> Self {
        Self {
            color,
            ..Self::new(text)
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::new(text)
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Paragraph command payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphCommand {
    /// Runs of the paragraph
    pub runs: Vec<Run>,
    /// Alignment
    pub alignment: Alignment,
    /// Left indent in points
    pub indent: f32,
    /// Font size in points
    pub font_size: f32,
}

impl ParagraphCommand {
    /// Plain text of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Per-cell layout style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
    /// Cell content must not split across a page boundary
    pub keep_together: bool,
}

impl CellStyle {
    /// Centered both ways, kept together on one page.
    pub fn centered() -> Self {
        Self {
            alignment: Alignment::Center,
            vertical_alignment: VerticalAlignment::Middle,
            keep_together: true,
        }
    }
}

/// A table cell of a table command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCellCommand {
    /// Paragraphs of the cell, each a list of runs
    pub paragraphs: Vec<Vec<Run>>,
    /// Images inside the cell
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Layout style
    pub style: CellStyle,
}

impl TableCellCommand {
    /// Create a single-run cell.
    pub fn text(text: impl Into<String>, color: MarkColor, style: CellStyle) -> Self {
        let text = text.into();
        let paragraphs = if text.is_empty() {
            Vec::new()
        } else {
            vec![vec![Run::colored(text, color)]]
        };
        Self {
            paragraphs,
            images: Vec::new(),
            style,
        }
    }

    /// Create an empty cell.
    pub fn empty(style: CellStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Plain text of the cell; paragraphs separated by `\n`.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.iter().map(|r| r.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A rectangular merge region, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// First row (index into `rows`)
    pub first_row: usize,
    /// Last row
    pub last_row: usize,
    /// First column
    pub first_column: usize,
    /// Last column
    pub last_column: usize,
}

impl Merge {
    /// Vertical merge of one column.
    pub fn vertical(column: usize, first_row: usize, last_row: usize) -> Self {
        Self {
            first_row,
            last_row,
            first_column: column,
            last_column: column,
        }
    }

    /// Number of rows covered.
    pub fn row_span(&self) -> usize {
        self.last_row - self.first_row + 1
    }
}

/// Table command payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCommand {
    /// Column titles
    pub columns: Vec<String>,
    /// Rows, header rows first
    pub rows: Vec<Vec<TableCellCommand>>,
    /// Number of header rows at the top of `rows`
    pub header_rows: usize,
    /// Merge regions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<Merge>,
}

impl TableCommand {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Body rows (non-header).
    pub fn body(&self) -> &[Vec<TableCellCommand>] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }

    /// Plain text of a column over the body rows.
    pub fn column_text(&self, column: usize) -> Vec<String> {
        self.body()
            .iter()
            .map(|row| row.get(column).map(|c| c.plain_text()).unwrap_or_default())
            .collect()
    }
}

/// Document protection modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionMode {
    /// Only form fields may be edited
    #[default]
    FormsOnly,
}

/// A structural instruction for the package writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Append a paragraph to the body.
    AddParagraph(ParagraphCommand),

    /// Append a table to the body.
    AddTable(TableCommand),

    /// Append an image to the body.
    AddImage {
        /// Source reference
        source: String,
        /// Display width in points
        width: f32,
    },

    /// Insert a dynamic page field into a template cell.
    SetHeaderField {
        /// Target cell
        cell: CellRef,
        /// Field kind
        kind: FieldKind,
        /// Literal shown until the viewer recomputes the field
        placeholder: String,
    },

    /// Replace the text of a template run.
    SubstituteText {
        /// Target run
        run: RunRef,
        /// New text
        value: String,
        /// Alignment forced on the run's paragraph
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alignment: Option<Alignment>,
    },

    /// Lock the document with a legacy protection hash.
    SetProtection {
        /// Hash as four uppercase hex digits
        hash: String,
        /// Protection mode
        mode: ProtectionMode,
    },
}

impl RenderCommand {
    /// Get the paragraph payload, if this is a paragraph.
    pub fn as_paragraph(&self) -> Option<&ParagraphCommand> {
        match self {
            RenderCommand::AddParagraph(p) => Some(p),
            _ => None,
        }
    }

    /// Get the table payload, if this is a table.
    pub fn as_table(&self) -> Option<&TableCommand> {
        match self {
            RenderCommand::AddTable(t) => Some(t),
            _ => None,
        }
    }

    /// Check if this command adds body content.
    pub fn is_body_content(&self) -> bool {
        matches!(
            self,
            RenderCommand::AddParagraph(_)
                | RenderCommand::AddTable(_)
                | RenderCommand::AddImage { .. }
        )
    }
}
