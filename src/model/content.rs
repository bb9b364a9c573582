//! Content tree types produced by the collaborative editor.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node of the editor content tree.
///
/// `Text` and `Image` are leaves; every other variant owns an ordered list of
/// children. The serde representation is the editor's own JSON document
/// format, read through [`crate::parser::EditorReader`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// Root of a document (also used for list wrappers)
    Document(Vec<ContentNode>),
    /// A paragraph of inline runs
    Paragraph(Vec<ContentNode>),
    /// A list item
    ListItem(Vec<ContentNode>),
    /// A table; children are `TableRow`s, the first one is the header
    Table(Vec<ContentNode>),
    /// A table row; children are `TableCell`s
    TableRow(Vec<ContentNode>),
    /// A table cell
    TableCell {
        /// Block content of the cell
        children: Vec<ContentNode>,
        /// Dropdown selection, if the cell is a dropdown field
        dropdown: Option<Dropdown>,
    },
    /// A literal text run
    Text {
        /// The text content
        text: String,
        /// Optional color/underline mark
        mark: Option<Mark>,
    },
    /// An image reference
    Image {
        /// Source reference (URL, storage key or data URI)
        src: String,
    },
}

impl ContentNode {
    /// Create a document root.
    pub fn document(children: Vec<ContentNode>) -> Self {
        ContentNode::Document(children)
    }

    /// Create a paragraph.
    pub fn paragraph(children: Vec<ContentNode>) -> Self {
        ContentNode::Paragraph(children)
    }

    /// Create a paragraph holding one plain text run.
    pub fn paragraph_text(text: impl Into<String>) -> Self {
        ContentNode::Paragraph(vec![ContentNode::text(text)])
    }

    /// Create a list item.
    pub fn list_item(children: Vec<ContentNode>) -> Self {
        ContentNode::ListItem(children)
    }

    /// Create a table from rows.
    pub fn table(rows: Vec<ContentNode>) -> Self {
        ContentNode::Table(rows)
    }

    /// Create a table row from cells.
    pub fn row(cells: Vec<ContentNode>) -> Self {
        ContentNode::TableRow(cells)
    }

    /// Create a row of plain text cells.
    pub fn row_from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        ContentNode::TableRow(values.into_iter().map(ContentNode::cell_text).collect())
    }

    /// Create a table cell.
    pub fn cell(children: Vec<ContentNode>) -> Self {
        ContentNode::TableCell {
            children,
            dropdown: None,
        }
    }

    /// Create a table cell holding one paragraph of plain text.
    pub fn cell_text(text: impl Into<String>) -> Self {
        Self::cell(vec![Self::paragraph_text(text)])
    }

    /// Create a plain text run.
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text {
            text: text.into(),
            mark: None,
        }
    }

    /// Create a text run with a mark.
    pub fn marked_text(text: impl Into<String>, mark: Mark) -> Self {
        ContentNode::Text {
            text: text.into(),
            mark: Some(mark),
        }
    }

    /// Create an image leaf.
    pub fn image(src: impl Into<String>) -> Self {
        ContentNode::Image { src: src.into() }
    }

    /// Get the node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            ContentNode::Document(_) => NodeKind::Document,
            ContentNode::Paragraph(_) => NodeKind::Paragraph,
            ContentNode::ListItem(_) => NodeKind::ListItem,
            ContentNode::Table(_) => NodeKind::Table,
            ContentNode::TableRow(_) => NodeKind::TableRow,
            ContentNode::TableCell { .. } => NodeKind::TableCell,
            ContentNode::Text { .. } => NodeKind::Text,
            ContentNode::Image { .. } => NodeKind::Image,
        }
    }

    /// Get the children of this node (empty for leaves).
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Document(c)
            | ContentNode::Paragraph(c)
            | ContentNode::ListItem(c)
            | ContentNode::Table(c)
            | ContentNode::TableRow(c)
            | ContentNode::TableCell { children: c, .. } => c,
            ContentNode::Text { .. } | ContentNode::Image { .. } => &[],
        }
    }

    /// Check if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, ContentNode::Text { .. } | ContentNode::Image { .. })
    }

    /// Concatenated text of every descendant run.
    ///
    /// Block-level children (paragraphs, list items) are separated by `\n`.
    pub fn plain_text(&self) -> String {
        match self {
            ContentNode::Text { text, .. } => text.clone(),
            ContentNode::Image { .. } => String::new(),
            ContentNode::Paragraph(children) => children.iter().map(|c| c.plain_text()).collect(),
            other => other
                .children()
                .iter()
                .map(|c| c.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Check if the subtree contains no text and no image.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentNode::Text { text, .. } => text.is_empty(),
            ContentNode::Image { .. } => false,
            other => other.children().iter().all(|c| c.is_empty()),
        }
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        crate::parser::to_editor_value(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::parser::EditorReader::default()
            .read_value(&value)
            .map_err(serde::de::Error::custom)
    }
}

/// Discriminant of a [`ContentNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Paragraph,
    ListItem,
    Table,
    TableRow,
    TableCell,
    Text,
    Image,
}

impl NodeKind {
    /// Editor type name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::ListItem => "listItem",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
        }
    }

    /// Check if this kind belongs to table structure.
    pub fn is_table_part(self) -> bool {
        matches!(
            self,
            NodeKind::Table | NodeKind::TableRow | NodeKind::TableCell
        )
    }
}

/// Mark colors observed in editor data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkColor {
    /// Default text color
    #[default]
    Black,
    /// Flag color for out-of-range or noteworthy values
    Red,
    /// Accent color
    Blue,
}

impl MarkColor {
    /// Normalize an editor color value.
    ///
    /// Accepts names, `#rgb`/`#rrggbb` hex and `rgb(r, g, b)`. Anything
    /// unrecognised maps to [`MarkColor::Black`].
    pub fn normalize(raw: &str) -> Self {
        let value: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match value.as_str() {
            "red" | "#f00" | "#ff0000" | "rgb(255,0,0)" => MarkColor::Red,
            "blue" | "#00f" | "#0000ff" | "rgb(0,0,255)" => MarkColor::Blue,
            "" | "black" | "#000" | "#000000" | "rgb(0,0,0)" => MarkColor::Black,
            _ => {
                log::debug!("Unrecognised mark color {:?}, using black", raw);
                MarkColor::Black
            }
        }
    }

    /// Hex value without the leading `#`.
    pub fn hex(self) -> &'static str {
        match self {
            MarkColor::Black => "000000",
            MarkColor::Red => "FF0000",
            MarkColor::Blue => "0000FF",
        }
    }
}

/// A text mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    /// Text color
    pub color: MarkColor,
    /// Underlined text
    pub underline: bool,
}

impl Mark {
    /// Create a color-only mark.
    pub fn color(color: MarkColor) -> Self {
        Self {
            color,
            underline: false,
        }
    }

    /// Red flag mark.
    pub fn red() -> Self {
        Self::color(MarkColor::Red)
    }
}

/// Dropdown selection attached to a table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropdown {
    /// Selected value
    pub value: String,
    /// Display color of the selection
    pub color: Option<MarkColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_normalize() {
        assert_eq!(MarkColor::normalize("red"), MarkColor::Red);
        assert_eq!(MarkColor::normalize("#FF0000"), MarkColor::Red);
        assert_eq!(MarkColor::normalize("rgb(0, 0, 255)"), MarkColor::Blue);
        assert_eq!(MarkColor::normalize("#123456"), MarkColor::Black);
        assert_eq!(MarkColor::normalize("chartreuse"), MarkColor::Black);
    }

    #[test]
    fn test_plain_text() {
        let cell = ContentNode::cell(vec![
            ContentNode::paragraph(vec![
                ContentNode::text("10.0"),
                ContentNode::marked_text(" mm", Mark::red()),
            ]),
            ContentNode::paragraph_text("max"),
        ]);
        assert_eq!(cell.plain_text(), "10.0 mm\nmax");
        assert!(!cell.is_empty());
        assert!(ContentNode::cell(vec![ContentNode::paragraph(vec![])]).is_empty());
    }

    #[test]
    fn test_children_of_leaf() {
        assert!(ContentNode::text("x").children().is_empty());
        assert!(ContentNode::image("a.png").is_leaf());
        assert_eq!(ContentNode::row_from_strings(["a", "b"]).children().len(), 2);
    }
}
