//! Header/footer fields and document protection.
//!
//! Runs after the body has been assembled: substitutes placeholder runs of
//! the page template, inserts running page-number fields and, when a
//! password is configured, locks the document to forms-only editing.

mod placeholder;
mod protection;

pub use placeholder::{Placeholder, RevisionField, RevisionLabels, REVISION_SLOTS};
pub use protection::ProtectionHash;

use crate::error::Result;
use crate::model::{AttributeHistory, PageTemplate};
use crate::render::{Alignment, ProtectionMode, RenderCommand, RenderSink};

/// Options for the finalizer.
#[derive(Debug, Clone)]
pub struct FinalizeOptions {
    /// Labels of revision reason/point cells
    pub revision_labels: RevisionLabels,

    /// Literal shown in page fields until the viewer recomputes them
    pub page_placeholder: String,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            revision_labels: RevisionLabels::default(),
            page_placeholder: "1".to_string(),
        }
    }
}

/// Emits template substitutions, page fields and protection.
#[derive(Debug, Clone, Default)]
pub struct Finalizer {
    options: FinalizeOptions,
}

impl Finalizer {
    /// Create a finalizer.
    pub fn new(options: FinalizeOptions) -> Self {
        Self { options }
    }

    /// Substitution commands for every placeholder run of the template.
    ///
    /// A run matches when its whole trimmed text equals a key.
    pub fn substitutions(&self, template: &PageTemplate, history: &AttributeHistory) -> Vec<RenderCommand> {
        let current = history.current().cloned().unwrap_or_default();
        let recent = history.recent(REVISION_SLOTS);

        template
            .runs()
            .filter_map(|(run, text)| {
                let key = text.trim();
                if let Some(placeholder) = Placeholder::parse(key) {
                    return Some(RenderCommand::SubstituteText {
                        run,
                        value: placeholder.value(&current),
                        alignment: placeholder.forces_left().then_some(Alignment::Left),
                    });
                }
                let (field, slot) = RevisionField::parse(key)?;
                let value = recent
                    .get(slot - 1)
                    .map(|attrs| field.value(attrs, &self.options.revision_labels))
                    .unwrap_or_default();
                Some(RenderCommand::SubstituteText {
                    run,
                    value,
                    alignment: None,
                })
            })
            .collect()
    }

    /// Page-number field commands for the template's declared slots.
    pub fn page_fields(&self, template: &PageTemplate) -> Vec<RenderCommand> {
        template
            .page_fields
            .iter()
            .map(|slot| RenderCommand::SetHeaderField {
                cell: slot.cell,
                kind: slot.kind,
                placeholder: self.options.page_placeholder.clone(),
            })
            .collect()
    }

    /// Protection command for a password; `None` when the password is empty.
    pub fn protection(&self, password: &str) -> Option<RenderCommand> {
        ProtectionHash::compute(password).map(|hash| RenderCommand::SetProtection {
            hash: hash.to_hex(),
            mode: ProtectionMode::FormsOnly,
        })
    }

    /// Emit all finalization commands to `sink`.
    pub fn finalize<S: RenderSink>(
        &self,
        template: &PageTemplate,
        history: &AttributeHistory,
        password: Option<&str>,
        sink: &mut S,
    ) -> Result<()> {
        for command in self.substitutions(template, history) {
            sink.emit(command)?;
        }
        for command in self.page_fields(template) {
            sink.emit(command)?;
        }
        match password.and_then(|p| self.protection(p)) {
            Some(command) => sink.emit(command)?,
            None => log::debug!("No protection password, document left unlocked"),
        }
        Ok(())
    }
}
