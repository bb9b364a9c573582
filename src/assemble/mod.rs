//! Section assembly: the fixed steps of a report, in order.
//!
//! For every step of a [`DocumentLayout`] the assembler emits a title line
//! `"{n}.{label}"` followed by the step body, drawn from attributes, step
//! content or references. Missing data renders the empty sentinel (`N/A`)
//! instead of failing.

mod layout;

pub use layout::{DocumentLayout, DocumentType, StepDef, StepSource};

use crate::error::{Error, Result};
use crate::model::{
    ContentNode, DocumentAttributes, Reference, ReferenceType, StepContent, StepContentItem,
    StepOption,
};
use crate::render::{
    Alignment, ContentWalker, ParagraphCommand, RenderCommand, RenderOptions, RenderSink, Run,
    SpecTableTransformer,
};

/// Borrowed view of the data one report is assembled from.
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    /// Current attribute snapshot, if any
    pub attributes: Option<&'a DocumentAttributes>,
    /// Step content objects
    pub contents: &'a [StepContent],
    /// References
    pub references: &'a [Reference],
}

/// Outcome of assembling the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    /// Steps rendered
    pub steps: usize,
    /// Steps rendered with the empty sentinel
    pub empty_steps: usize,
}

/// Drives the walker and table transformer across the steps of a layout.
pub struct SectionAssembler<'a> {
    layout: &'a DocumentLayout,
    options: &'a RenderOptions,
}

impl<'a> SectionAssembler<'a> {
    /// Create an assembler.
    pub fn new(layout: &'a DocumentLayout, options: &'a RenderOptions) -> Self {
        Self { layout, options }
    }

    /// Emit the whole report body to `sink`.
    pub fn assemble<S: RenderSink>(&self, data: &ReportData<'_>, sink: &mut S) -> Result<AssemblySummary> {
        let mut summary = AssemblySummary::default();

        for (i, step) in self.layout.steps.iter().enumerate() {
            let number = i + 1;
            log::debug!("Assembling step {}.{}", number, step.label);
            sink.emit(self.paragraph(
                vec![Run::bold(format!("{}.{}", number, step.label))],
                0.0,
            ))?;

            let rendered = match &step.source {
                StepSource::Attribute { key } => self.attribute_step(data, key, sink)?,
                StepSource::Content {
                    code,
                    parameter_table,
                } => self.content_step(data, number, code, *parameter_table, sink)?,
                StepSource::Reference { reference_type } => {
                    self.reference_step(data, *reference_type, sink)?
                }
            };

            if !rendered {
                sink.emit(self.text_line(&self.options.empty_sentinel))?;
                summary.empty_steps += 1;
            }
            summary.steps += 1;
        }

        Ok(summary)
    }

    fn paragraph(&self, runs: Vec<Run>, indent: f32) -> RenderCommand {
        RenderCommand::AddParagraph(ParagraphCommand {
            runs,
            alignment: Alignment::Left,
            indent,
            font_size: self.options.font_size,
        })
    }

    /// A plain body line at the attribute indent.
    fn text_line(&self, text: &str) -> RenderCommand {
        self.paragraph(vec![Run::new(text)], self.options.attribute_indent())
    }

    fn attribute_step<S: RenderSink>(
        &self,
        data: &ReportData<'_>,
        key: &str,
        sink: &mut S,
    ) -> Result<bool> {
        let Some(value) = data.attributes.and_then(|a| a.section(key)) else {
            return Ok(false);
        };
        for line in value.lines() {
            sink.emit(self.text_line(line))?;
        }
        Ok(true)
    }

    fn reference_step<S: RenderSink>(
        &self,
        data: &ReportData<'_>,
        reference_type: ReferenceType,
        sink: &mut S,
    ) -> Result<bool> {
        let mut count = 0;
        for reference in data
            .references
            .iter()
            .filter(|r| r.reference_type == reference_type)
        {
            count += 1;
            sink.emit(self.text_line(&format!(
                "({}) {} - {}",
                count, reference.id, reference.name
            )))?;
        }
        Ok(count > 0)
    }

    fn content_step<S: RenderSink>(
        &self,
        data: &ReportData<'_>,
        number: usize,
        code: &str,
        parameter_table: bool,
        sink: &mut S,
    ) -> Result<bool> {
        let contents: Vec<&StepContent> = data
            .contents
            .iter()
            .filter(|c| c.step_code == code)
            .collect();

        let mut items: Vec<&StepContentItem> = contents.iter().flat_map(|c| &c.items).collect();
        if contents.is_empty() || (items.is_empty() && !parameter_table) {
            return Ok(false);
        }

        if parameter_table {
            for (c, content) in contents.iter().enumerate() {
                sink.emit(self.text_line(&format!(
                    "{}: {}",
                    self.options.program_label,
                    content.program_summary()
                )))?;

                let tables = [
                    ("conditionTable", &content.condition_table),
                    ("parameterTable", &content.parameter_table),
                ];
                for (name, table) in tables {
                    if let Some(table) = table {
                        let path = format!("$.step[{}].contents[{}].{}", number, c, name);
                        self.embedded_table(table, &path, sink)?;
                    }
                }
            }
        }

        items.sort_by_cached_key(|item| sub_no_key(&item.sub_no));
        for item in items {
            self.item(number, item, sink)?;
        }
        Ok(true)
    }

    fn embedded_table<S: RenderSink>(&self, table: &ContentNode, path: &str, sink: &mut S) -> Result<()> {
        if let Some(command) = SpecTableTransformer::new(self.options).transform(table, path)? {
            sink.emit(RenderCommand::AddTable(command))?;
        }
        Ok(())
    }

    fn item<S: RenderSink>(&self, number: usize, item: &StepContentItem, sink: &mut S) -> Result<()> {
        let label = if item.sub_no.trim().is_empty() {
            number.to_string()
        } else {
            format!("{}.{}", number, item.sub_no.trim())
        };
        let tier = item.tier.max(1);
        let path = format!("$.step[{}].item[{}]", number, label);

        match &item.header {
            Some(header) => emit_walk(
                ContentWalker::header(header, tier, Some(&label), self.options),
                sink,
                &format!("{}.header", path),
            )?,
            None => sink.emit(self.paragraph(
                vec![Run::new(label.clone())],
                self.options.tier_indent(tier),
            ))?,
        }

        match item.option {
            StepOption::HeaderOnly => {}
            StepOption::HeaderTable => {
                if let Some(content) = &item.content {
                    if !matches!(content, ContentNode::Table(_)) {
                        log::debug!("Item {} is header+table but its content is not a table", label);
                    }
                    emit_walk(
                        ContentWalker::new(content, tier.saturating_add(1), self.options),
                        sink,
                        &format!("{}.content", path),
                    )?;
                }
            }
            StepOption::HeaderContentPictures => {
                if let Some(content) = &item.content {
                    emit_walk(
                        ContentWalker::new(content, tier.saturating_add(1), self.options),
                        sink,
                        &format!("{}.content", path),
                    )?;
                }
                let width = self.options.picture_width();
                for file in &item.files {
                    sink.emit(RenderCommand::AddImage {
                        source: file.source.clone(),
                        width,
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Drain a walker into the sink, rooting structural error paths at `prefix`.
fn emit_walk<S: RenderSink>(walker: ContentWalker<'_>, sink: &mut S, prefix: &str) -> Result<()> {
    for command in walker {
        let command = command.map_err(|e| relocate(e, prefix))?;
        sink.emit(command)?;
    }
    Ok(())
}

fn relocate(err: Error, prefix: &str) -> Error {
    let rebase = |path: String| match path.strip_prefix('$') {
        Some(rest) => format!("{}{}", prefix, rest),
        None => path,
    };
    match err {
        Error::MalformedNode { path, reason } => Error::MalformedNode {
            path: rebase(path),
            reason,
        },
        Error::DepthExceeded { path, limit } => Error::DepthExceeded {
            path: rebase(path),
            limit,
        },
        other => other,
    }
}

/// Sort key of a sub-number: numeric dot-separated segments.
fn sub_no_key(sub_no: &str) -> Vec<u64> {
    sub_no
        .split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_no_key_orders_naturally() {
        let mut subs = vec!["2.10", "2.9", "1", "x", "2"];
        subs.sort_by_key(|s| sub_no_key(s));
        assert_eq!(subs, vec!["1", "2", "2.9", "2.10", "x"]);
    }

    #[test]
    fn test_relocate_path() {
        let err = relocate(
            Error::malformed("$.content[1]", "bad"),
            "$.step[5].item[5.1].content",
        );
        match err {
            Error::MalformedNode { path, .. } => {
                assert_eq!(path, "$.step[5].item[5.1].content.content[1]")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_attribute_step_na() {
        let layout = DocumentLayout::specification();
        let options = RenderOptions::default();
        let data = ReportData {
            attributes: None,
            contents: &[],
            references: &[],
        };
        let mut sink: Vec<RenderCommand> = Vec::new();
        let summary = SectionAssembler::new(&layout, &options)
            .assemble(&data, &mut sink)
            .unwrap();
        assert_eq!(summary.steps, 6);
        assert_eq!(summary.empty_steps, 6);
        assert_eq!(sink.len(), 12);
        let na = sink[1].as_paragraph().unwrap();
        assert_eq!(na.plain_text(), "N/A");
        assert_eq!(na.indent, 24.0);
    }
}
