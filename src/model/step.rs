//! Per-step content supplied by the document store.

use super::ContentNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a step content item is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOption {
    /// Header line only
    #[default]
    HeaderOnly,
    /// Header, body content, then attached pictures
    HeaderContentPictures,
    /// Header followed by a table
    HeaderTable,
}

/// A file attached to a step content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Display name of the file
    #[serde(default)]
    pub name: String,
    /// Source reference passed through to the sink
    pub source: String,
}

impl FileRef {
    /// Create a file reference.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// One data item of a step: a header block plus optional body or table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepContentItem {
    /// Nesting tier (1 = top level)
    pub tier: u32,

    /// Sub-number within the step, e.g. `"2"` or `"2.1"`
    #[serde(default)]
    pub sub_no: String,

    /// Layout option
    #[serde(default)]
    pub option: StepOption,

    /// Header content
    #[serde(default)]
    pub header: Option<ContentNode>,

    /// Body content (a table for [`StepOption::HeaderTable`])
    #[serde(default)]
    pub content: Option<ContentNode>,

    /// Attached pictures
    #[serde(default)]
    pub files: Vec<FileRef>,

    /// Opaque metadata from the store
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl StepContentItem {
    /// Create an item with the given tier, sub-number and option.
    pub fn new(tier: u32, sub_no: impl Into<String>, option: StepOption) -> Self {
        Self {
            tier,
            sub_no: sub_no.into(),
            option,
            header: None,
            content: None,
            files: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Set the header and return self.
    pub fn with_header(mut self, header: ContentNode) -> Self {
        self.header = Some(header);
        self
    }

    /// Set the body content and return self.
    pub fn with_content(mut self, content: ContentNode) -> Self {
        self.content = Some(content);
        self
    }

    /// Attach a file and return self.
    pub fn with_file(mut self, file: FileRef) -> Self {
        self.files.push(file);
        self
    }
}

/// A content object of a step, grouping its data items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepContent {
    /// Code of the step this content belongs to
    pub step_code: String,

    /// Program codes (parameter-table steps)
    #[serde(default)]
    pub program_codes: Vec<String>,

    /// Embedded condition table (parameter-table steps)
    #[serde(default)]
    pub condition_table: Option<ContentNode>,

    /// Embedded parameter table (parameter-table steps)
    #[serde(default)]
    pub parameter_table: Option<ContentNode>,

    /// Data items
    #[serde(default)]
    pub items: Vec<StepContentItem>,
}

impl StepContent {
    /// Create an empty content object for a step.
    pub fn new(step_code: impl Into<String>) -> Self {
        Self {
            step_code: step_code.into(),
            program_codes: Vec::new(),
            condition_table: None,
            parameter_table: None,
            items: Vec::new(),
        }
    }

    /// Add an item and return self.
    pub fn with_item(mut self, item: StepContentItem) -> Self {
        self.items.push(item);
        self
    }

    /// Summary line of the program codes, `"NA"` when there are none.
    pub fn program_summary(&self) -> String {
        let codes: Vec<&str> = self
            .program_codes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            "NA".to_string()
        } else {
            codes.join(", ")
        }
    }
}
