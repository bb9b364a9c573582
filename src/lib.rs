//! # stepdoc
//!
//! Rendering engine for manufacturing instructions and product
//! specifications.
//!
//! A report is described by its attribute history, per-step editor content,
//! references and a header/footer template. The renderer walks that data and
//! produces an ordered stream of [`RenderCommand`]s for a document writer:
//! numbered step titles, indented paragraphs, specification tables with
//! derived tolerance columns, images, page fields and protection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stepdoc::{ReportRenderer, ReportRequest};
//!
//! fn main() -> stepdoc::Result<()> {
//!     let json = std::fs::read_to_string("report.json")?;
//!     let request = ReportRequest::from_json(&json)?;
//!
//!     let mut commands = Vec::new();
//!     let stats = ReportRenderer::new().render(&request, &mut commands)?;
//!     println!("{} commands, {} tables", commands.len(), stats.table_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`compose()`]: tolerance strings such as `"+2/-2\n(8~12)"`
//! - [`render::SpecTableTransformer`]: limit columns to derived values
//! - [`render::ContentWalker`]: editor trees to paragraphs, tables, images
//! - [`assemble::SectionAssembler`]: the numbered steps of a report
//! - [`finalize::Finalizer`]: header/footer fields and protection

pub mod assemble;
pub mod compose;
pub mod error;
pub mod finalize;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use assemble::{DocumentLayout, DocumentType, ReportData, SectionAssembler, StepSource};
pub use compose::compose;
pub use error::{Error, Result};
pub use finalize::{FinalizeOptions, Finalizer, ProtectionHash};
pub use model::{
    AttributeHistory, ContentNode, DocumentAttributes, MarkColor, PageTemplate, Reference,
    ReferenceType, StepContent, StepContentItem, StepOption,
};
pub use parser::{EditorReader, ParseOptions};
pub use render::{
    JsonLinesSink, RenderCommand, RenderOptions, RenderSink, RenderStats, StatsSink,
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Everything needed to render one report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    /// Report shape; selects the built-in layout
    pub document_type: DocumentType,

    /// Custom layout overriding the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<DocumentLayout>,

    /// Attribute snapshots, oldest first
    pub history: AttributeHistory,

    /// Step content objects
    pub contents: Vec<StepContent>,

    /// Referenced documents and forms
    pub references: Vec<Reference>,

    /// Header/footer template
    pub template: PageTemplate,

    /// Forms-only protection password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ReportRequest {
    /// Create an empty request for a report shape.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            ..Default::default()
        }
    }

    /// Parse a request from JSON.
    ///
    /// Content trees are read strictly: unknown editor nodes fail the parse.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)?;
        if let Some(layout) = &request.layout {
            layout.validate()?;
        }
        Ok(request)
    }

    fn data(&self) -> ReportData<'_> {
        ReportData {
            attributes: self.history.current(),
            contents: &self.contents,
            references: &self.references,
        }
    }
}

/// Render a request with default options.
///
/// # Example
///
/// ```
/// use stepdoc::{render, DocumentType, ReportRequest};
///
/// let commands = render(&ReportRequest::new(DocumentType::Specification)).unwrap();
/// assert_eq!(commands.len(), 12);
/// ```
pub fn render(request: &ReportRequest) -> Result<Vec<RenderCommand>> {
    ReportRenderer::new().render_to_vec(request)
}

/// Builder for rendering reports.
///
/// # Example
///
/// ```no_run
/// use stepdoc::{JsonLinesSink, ReportRenderer, ReportRequest, RenderOptions};
///
/// let request = ReportRequest::from_json(&std::fs::read_to_string("report.json")?)?;
/// let mut sink = JsonLinesSink::new(std::io::stdout());
/// ReportRenderer::new()
///     .with_options(RenderOptions::new().with_font_size(11.0))
///     .render(&request, &mut sink)?;
/// # Ok::<(), stepdoc::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    options: RenderOptions,
    finalizer: Finalizer,
    layout: Option<DocumentLayout>,
}

impl ReportRenderer {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Set finalizer options.
    pub fn with_finalize_options(mut self, options: FinalizeOptions) -> Self {
        self.finalizer = Finalizer::new(options);
        self
    }

    /// Use a fixed layout for every request that does not carry its own.
    pub fn with_layout(mut self, layout: DocumentLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Render options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn layout_for(&self, request: &ReportRequest) -> Result<DocumentLayout> {
        let layout = match (&request.layout, &self.layout) {
            (Some(layout), _) | (None, Some(layout)) => layout.clone(),
            (None, None) => DocumentLayout::for_type(request.document_type),
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Render a request into `sink`: body first, then template fields and
    /// protection. The sink is finished on success.
    pub fn render<S: RenderSink>(&self, request: &ReportRequest, sink: &mut S) -> Result<RenderStats> {
        let layout = self.layout_for(request)?;
        log::debug!(
            "Rendering {:?} report with {} steps",
            layout.document_type,
            layout.len()
        );

        let mut sink = StatsSink::new(sink);
        let summary = SectionAssembler::new(&layout, &self.options).assemble(&request.data(), &mut sink)?;
        self.finalizer.finalize(
            &request.template,
            &request.history,
            request.password.as_deref(),
            &mut sink,
        )?;
        sink.finish()?;

        let (_, mut stats) = sink.into_parts();
        stats.empty_step_count = summary.empty_steps as u32;
        Ok(stats)
    }

    /// Render a request into a command vector.
    pub fn render_to_vec(&self, request: &ReportRequest) -> Result<Vec<RenderCommand>> {
        let mut commands = Vec::new();
        self.render(request, &mut commands)?;
        Ok(commands)
    }

    /// Render independent requests in parallel.
    ///
    /// Results keep the order of `requests`; one failure does not affect the
    /// others.
    pub fn render_batch(&self, requests: &[ReportRequest]) -> Vec<Result<Vec<RenderCommand>>> {
        requests
            .par_iter()
            .map(|request| self.render_to_vec(request))
            .collect()
    }
}
