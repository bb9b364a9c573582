//! Step tables of the fixed report shapes.
//!
//! A [`DocumentLayout`] is plain data: an ordered list of step labels and
//! where each step's body comes from. The two built-in layouts are
//! constructed here; custom layouts load from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::ReferenceType;

/// Report shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Manufacturing instruction
    #[default]
    Manufacturing,
    /// Product specification
    Specification,
}

/// Where the body of a step comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSource {
    /// A text attribute of the current revision
    Attribute {
        /// Key into the attribute sections
        key: String,
    },
    /// Step content objects with the given code
    Content {
        /// Step code matched against [`StepContent::step_code`](crate::model::StepContent)
        code: String,
        /// Render program summaries and embedded tables first
        #[serde(default)]
        parameter_table: bool,
    },
    /// References of one category
    Reference {
        /// Category to list
        reference_type: ReferenceType,
    },
}

/// One numbered step of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    /// Title label (without the number)
    pub label: String,
    /// Body source
    pub source: StepSource,
}

impl StepDef {
    fn attribute(label: &str, key: &str) -> Self {
        Self {
            label: label.to_string(),
            source: StepSource::Attribute {
                key: key.to_string(),
            },
        }
    }

    fn content(label: &str, code: &str, parameter_table: bool) -> Self {
        Self {
            label: label.to_string(),
            source: StepSource::Content {
                code: code.to_string(),
                parameter_table,
            },
        }
    }

    fn reference(label: &str, reference_type: ReferenceType) -> Self {
        Self {
            label: label.to_string(),
            source: StepSource::Reference { reference_type },
        }
    }
}

/// Ordered step table of a report shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Report shape
    pub document_type: DocumentType,
    /// Steps in print order
    pub steps: Vec<StepDef>,
}

impl DocumentLayout {
    /// Seven-step manufacturing instruction layout.
    pub fn manufacturing() -> Self {
        Self {
            document_type: DocumentType::Manufacturing,
            steps: vec![
                StepDef::attribute("Purpose", "purpose"),
                StepDef::attribute("Scope", "scope"),
                StepDef::reference("Reference Documents", ReferenceType::Document),
                StepDef::reference("Related Forms", ReferenceType::Form),
                StepDef::content("Materials and Equipment", "material", false),
                StepDef::content("Process Parameters", "parameter", true),
                StepDef::content("Operating Procedure", "procedure", false),
            ],
        }
    }

    /// Six-step specification layout.
    pub fn specification() -> Self {
        Self {
            document_type: DocumentType::Specification,
            steps: vec![
                StepDef::attribute("Purpose", "purpose"),
                StepDef::attribute("Scope", "scope"),
                StepDef::reference("Reference Documents", ReferenceType::Document),
                StepDef::attribute("Definitions", "definition"),
                StepDef::content("Specification Items", "specification", true),
                StepDef::content("Inspection Method", "inspection", false),
            ],
        }
    }

    /// Built-in layout of a report shape.
    pub fn for_type(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::Manufacturing => Self::manufacturing(),
            DocumentType::Specification => Self::specification(),
        }
    }

    /// Load and validate a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check the layout is usable.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::InvalidLayout("layout has no steps".into()));
        }

        let mut codes = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.label.trim().is_empty() {
                return Err(Error::InvalidLayout(format!("step {} has no label", i + 1)));
            }
            if let StepSource::Content { code, .. } = &step.source {
                if !codes.insert(code.as_str()) {
                    return Err(Error::InvalidLayout(format!(
                        "content code `{}` used by more than one step",
                        code
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the layout has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_step_counts() {
        assert_eq!(DocumentLayout::manufacturing().len(), 7);
        assert_eq!(DocumentLayout::specification().len(), 6);
        assert!(DocumentLayout::manufacturing().validate().is_ok());
        assert!(DocumentLayout::specification().validate().is_ok());
    }

    #[test]
    fn test_for_type() {
        let layout = DocumentLayout::for_type(DocumentType::Specification);
        assert_eq!(layout.document_type, DocumentType::Specification);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "document_type": "manufacturing",
            "steps": [
                {"label": "Purpose", "source": {"kind": "attribute", "key": "purpose"}},
                {"label": "Forms", "source": {"kind": "reference", "reference_type": 1}},
                {"label": "Parameters", "source": {"kind": "content", "code": "p", "parameter_table": true}}
            ]
        }"#;
        let layout = DocumentLayout::from_json(json).unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(
            layout.steps[1].source,
            StepSource::Reference {
                reference_type: ReferenceType::Form
            }
        );
    }

    #[test]
    fn test_invalid_layouts() {
        let empty = r#"{"document_type": "specification", "steps": []}"#;
        assert!(matches!(
            DocumentLayout::from_json(empty),
            Err(Error::InvalidLayout(_))
        ));

        let duplicate = r#"{"document_type": "specification", "steps": [
            {"label": "A", "source": {"kind": "content", "code": "x"}},
            {"label": "B", "source": {"kind": "content", "code": "x"}}
        ]}"#;
        assert!(DocumentLayout::from_json(duplicate).is_err());
    }

    #[test]
    fn test_layout_round_trip_json() {
        let layout = DocumentLayout::manufacturing();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(DocumentLayout::from_json(&json).unwrap(), layout);
    }
}
