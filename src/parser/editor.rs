//! Reader and writer for the editor's JSON document format.

use serde_json::{json, Map, Value};

use super::{ErrorMode, ParseOptions};
use crate::error::{Error, Result};
use crate::model::{ContentNode, Dropdown, Mark, MarkColor};

/// Reads editor JSON into [`ContentNode`] trees.
///
/// Every structural problem is reported with the path of the offending
/// node (`$` is the root, `$.content[2]` its third child, and so on).
#[derive(Debug, Clone, Default)]
pub struct EditorReader {
    options: ParseOptions,
}

impl EditorReader {
    /// Create a reader with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Read a content tree from a JSON string.
    pub fn read_str(&self, json: &str) -> Result<ContentNode> {
        let value: Value = serde_json::from_str(json)?;
        self.read_value(&value)
    }

    /// Read a content tree from a parsed JSON value.
    pub fn read_value(&self, value: &Value) -> Result<ContentNode> {
        match self.read_node(value, "$", 0)? {
            Some(node) => Ok(node),
            None => Err(Error::malformed("$", "root node has an unsupported type")),
        }
    }

    fn read_node(&self, value: &Value, path: &str, depth: usize) -> Result<Option<ContentNode>> {
        if depth >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: path.to_string(),
                limit: self.options.max_depth,
            });
        }

        let obj = value
            .as_object()
            .ok_or_else(|| Error::malformed(path, "node is not an object"))?;
        let node_type = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed(path, "missing `type`"))?;

        let node = match node_type {
            "text" => {
                let text = obj
                    .get("text")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::malformed(path, "text node without `text`"))?;
                ContentNode::Text {
                    text: text.to_string(),
                    mark: read_marks(obj.get("marks")),
                }
            }
            "hardBreak" => ContentNode::text("\n"),
            "image" => {
                let src = attr_str(obj, "src")
                    .ok_or_else(|| Error::malformed(path, "image node without `attrs.src`"))?;
                ContentNode::image(src)
            }
            "doc" | "bulletList" | "orderedList" => {
                ContentNode::Document(self.read_children(obj, path, depth)?)
            }
            "paragraph" | "heading" => ContentNode::Paragraph(self.read_children(obj, path, depth)?),
            "listItem" => ContentNode::ListItem(self.read_children(obj, path, depth)?),
            "table" => ContentNode::Table(self.read_children(obj, path, depth)?),
            "tableRow" => ContentNode::TableRow(self.read_children(obj, path, depth)?),
            "tableCell" | "tableHeader" => ContentNode::TableCell {
                children: self.read_children(obj, path, depth)?,
                dropdown: read_dropdown(obj),
            },
            other => match self.options.error_mode {
                ErrorMode::Strict => {
                    return Err(Error::malformed(
                        path,
                        format!("unsupported node type `{}`", other),
                    ))
                }
                ErrorMode::Lenient if obj.contains_key("content") => {
                    log::warn!("Reading unknown node type `{}` at {} as a container", other, path);
                    ContentNode::Document(self.read_children(obj, path, depth)?)
                }
                ErrorMode::Lenient => {
                    log::warn!("Skipping unknown leaf `{}` at {}", other, path);
                    return Ok(None);
                }
            },
        };

        Ok(Some(node))
    }

    fn read_children(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<Vec<ContentNode>> {
        let items = match obj.get("content") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(Error::malformed(path, "`content` is not an array")),
        };

        let mut children = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let child_path = format!("{}.content[{}]", path, i);
            if let Some(node) = self.read_node(item, &child_path, depth + 1)? {
                children.push(node);
            }
        }
        Ok(children)
    }
}

fn attr_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get("attrs")
        .and_then(|a| a.get(key))
        .and_then(Value::as_str)
}

fn read_marks(marks: Option<&Value>) -> Option<Mark> {
    let marks = marks?.as_array()?;
    let mut mark = Mark::default();
    let mut seen = false;

    for m in marks {
        match m.get("type").and_then(Value::as_str) {
            Some("textStyle") | Some("color") => {
                if let Some(color) = m
                    .get("attrs")
                    .and_then(|a| a.get("color"))
                    .and_then(Value::as_str)
                {
                    mark.color = MarkColor::normalize(color);
                    seen = true;
                }
            }
            Some("underline") => {
                mark.underline = true;
                seen = true;
            }
            _ => {}
        }
    }

    seen.then_some(mark)
}

fn read_dropdown(obj: &Map<String, Value>) -> Option<Dropdown> {
    let value = attr_str(obj, "dropdownValue")?;
    Some(Dropdown {
        value: value.to_string(),
        color: attr_str(obj, "dropdownColor").map(MarkColor::normalize),
    })
}

/// Write a content tree back to editor JSON.
pub fn to_editor_value(node: &ContentNode) -> Value {
    let children = |c: &[ContentNode]| Value::Array(c.iter().map(to_editor_value).collect());

    match node {
        ContentNode::Document(c) => json!({"type": "doc", "content": children(c)}),
        ContentNode::Paragraph(c) => json!({"type": "paragraph", "content": children(c)}),
        ContentNode::ListItem(c) => json!({"type": "listItem", "content": children(c)}),
        ContentNode::Table(c) => json!({"type": "table", "content": children(c)}),
        ContentNode::TableRow(c) => json!({"type": "tableRow", "content": children(c)}),
        ContentNode::TableCell { children: c, dropdown } => {
            let mut cell = json!({"type": "tableCell", "content": children(c)});
            if let Some(d) = dropdown {
                let mut attrs = json!({"dropdownValue": d.value});
                if let Some(color) = d.color {
                    attrs["dropdownColor"] = json!(format!("#{}", color.hex()));
                }
                cell["attrs"] = attrs;
            }
            cell
        }
        ContentNode::Text { text, mark } => {
            let mut run = json!({"type": "text", "text": text});
            if let Some(mark) = mark {
                let mut marks = vec![json!({
                    "type": "textStyle",
                    "attrs": {"color": format!("#{}", mark.color.hex())}
                })];
                if mark.underline {
                    marks.push(json!({"type": "underline"}));
                }
                run["marks"] = Value::Array(marks);
            }
            run
        }
        ContentNode::Image { src } => json!({"type": "image", "attrs": {"src": src}}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_paragraph_with_marks() {
        let json = r##"{
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    {"type": "text", "text": "Torque "},
                    {"type": "text", "text": "12 Nm", "marks": [
                        {"type": "textStyle", "attrs": {"color": "#ff0000"}},
                        {"type": "underline"}
                    ]}
                ]
            }]
        }"##;
        let doc = EditorReader::default().read_str(json).unwrap();
        let para = &doc.children()[0];
        assert_eq!(para.plain_text(), "Torque 12 Nm");
        match &para.children()[1] {
            ContentNode::Text { mark: Some(mark), .. } => {
                assert_eq!(mark.color, MarkColor::Red);
                assert!(mark.underline);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_missing_text_reports_path() {
        let json = r#"{"type": "doc", "content": [
            {"type": "paragraph"},
            {"type": "paragraph", "content": [{"type": "text"}]}
        ]}"#;
        let err = EditorReader::default().read_str(json).unwrap_err();
        match err {
            Error::MalformedNode { path, .. } => assert_eq!(path, "$.content[1].content[0]"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_strict_and_lenient() {
        let json = r#"{"type": "doc", "content": [
            {"type": "blockquote", "content": [{"type": "paragraph"}]},
            {"type": "mention"}
        ]}"#;
        assert!(EditorReader::default().read_str(json).is_err());

        let doc = EditorReader::new(ParseOptions::new().lenient())
            .read_str(json)
            .unwrap();
        assert_eq!(doc.children().len(), 1);
    }

    #[test]
    fn test_depth_guard() {
        let mut json = String::from(r#"{"type": "paragraph"}"#);
        for _ in 0..10 {
            json = format!(r#"{{"type": "doc", "content": [{}]}}"#, json);
        }
        let reader = EditorReader::new(ParseOptions::new().with_max_depth(5));
        assert!(matches!(
            reader.read_str(&json),
            Err(Error::DepthExceeded { limit: 5, .. })
        ));
    }

    #[test]
    fn test_dropdown_cell_and_write_back() {
        let json = r#"{"type": "tableCell",
            "attrs": {"dropdownValue": "NG", "dropdownColor": "red"},
            "content": []}"#;
        let cell = EditorReader::default().read_str(json).unwrap();
        match &cell {
            ContentNode::TableCell { dropdown: Some(d), .. } => {
                assert_eq!(d.value, "NG");
                assert_eq!(d.color, Some(MarkColor::Red));
            }
            other => panic!("unexpected node {:?}", other),
        }

        let again = EditorReader::default()
            .read_value(&to_editor_value(&cell))
            .unwrap();
        assert_eq!(again, cell);
    }
}
