//! Data model for report rendering.
//!
//! These types describe what the document store hands to the renderer: the
//! editor content tree, per-step content items, attribute history,
//! references and the header/footer template. All of them are consumed
//! read-only.

mod attribute;
mod content;
mod step;
mod template;

pub use attribute::{AttributeHistory, DocumentAttributes, Reference, ReferenceType};
pub use content::{ContentNode, Dropdown, Mark, MarkColor, NodeKind};
pub use step::{FileRef, StepContent, StepContentItem, StepOption};
pub use template::{
    CellRef, FieldKind, PageFieldSlot, PageTemplate, RunRef, TemplateParagraph, TemplatePart,
};
