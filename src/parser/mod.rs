//! Editor JSON reading.
//!
//! The collaborative editor stores documents as nested JSON objects of the
//! form `{"type": "paragraph", "content": [...]}`. This module turns them into
//! [`ContentNode`](crate::model::ContentNode) trees and back.

mod editor;
mod options;

pub use editor::{to_editor_value, EditorReader};
pub use options::{ErrorMode, ParseOptions, DEFAULT_MAX_DEPTH};
