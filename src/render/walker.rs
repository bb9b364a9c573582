//! Content tree walking.
//!
//! [`ContentWalker`] flattens a content tree into render commands one at a
//! time. It keeps an explicit stack instead of recursing, so each call to
//! `next` does a bounded amount of work and a deep tree cannot overflow the
//! call stack.
//!
//! # Example
//!
//! ```
//! use stepdoc::model::ContentNode;
//! use stepdoc::render::{ContentWalker, RenderOptions};
//!
//! let doc = ContentNode::document(vec![
//!     ContentNode::paragraph_text("Clean the fixture."),
//!     ContentNode::paragraph_text("Load the part."),
//! ]);
//! let options = RenderOptions::default();
//! let commands: Vec<_> = ContentWalker::new(&doc, 1, &options)
//!     .collect::<stepdoc::Result<_>>()?;
//! assert_eq!(commands.len(), 2);
//! # Ok::<(), stepdoc::Error>(())
//! ```

use super::command::{Alignment, ParagraphCommand, RenderCommand, Run};
use super::sink::RenderSink;
use super::spec_table::{runs_of, SpecTableTransformer};
use super::RenderOptions;
use crate::error::{Error, Result};
use crate::model::ContentNode;

/// A pending node on the walk stack.
#[derive(Debug)]
struct Frame<'a> {
    node: &'a ContentNode,
    tier: u32,
    depth: usize,
    path: String,
}

/// Lazy, single-pass walker over a content tree.
///
/// Yields `Err` at most once and then stops; restarting means creating a
/// new walker from the root.
pub struct ContentWalker<'a> {
    options: &'a RenderOptions,
    stack: Vec<Frame<'a>>,
    root_tier: u32,
    prefix: Option<String>,
    pending: Option<RenderCommand>,
    failed: bool,
}

impl<'a> ContentWalker<'a> {
    /// Walk `node`, treating it as sitting at `tier`.
    pub fn new(node: &'a ContentNode, tier: u32, options: &'a RenderOptions) -> Self {
        Self {
            options,
            stack: vec![Frame {
                node,
                tier,
                depth: 0,
                path: "$".to_string(),
            }],
            root_tier: tier,
            prefix: None,
            pending: None,
            failed: false,
        }
    }

    /// Walk a header block, prefixing its first run with a number label.
    ///
    /// When the block starts with a table or an image, or has no text at
    /// all, the label is emitted as a paragraph of its own at `tier`.
    pub fn header(
        node: &'a ContentNode,
        tier: u32,
        no: Option<&str>,
        options: &'a RenderOptions,
    ) -> Self {
        let mut walker = Self::new(node, tier, options);
        walker.prefix = no
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        walker
    }

    /// Check if the walk is finished.
    pub fn is_done(&self) -> bool {
        self.failed || (self.stack.is_empty() && self.pending.is_none() && self.prefix.is_none())
    }

    /// Send every remaining command to `sink`, returning how many were sent.
    pub fn emit_to<S: RenderSink>(self, sink: &mut S) -> Result<usize> {
        let mut count = 0;
        for command in self {
            sink.emit(command?)?;
            count += 1;
        }
        Ok(count)
    }

    fn push_children(&mut self, frame: &Frame<'a>, skip_text: bool) {
        let children = frame.node.children();
        for (i, child) in children.iter().enumerate().rev() {
            if skip_text && matches!(child, ContentNode::Text { .. }) {
                continue;
            }
            self.stack.push(Frame {
                node: child,
                tier: frame.tier.saturating_add(1),
                depth: frame.depth + 1,
                path: format!("{}.content[{}]", frame.path, i),
            });
        }
    }

    fn paragraph(&mut self, mut runs: Vec<Run>, tier: u32) -> RenderCommand {
        if let Some(prefix) = self.prefix.take() {
            match runs.first_mut() {
                Some(first) => first.text = format!("{} {}", prefix, first.text),
                None => runs.push(Run::new(prefix)),
            }
        }
        RenderCommand::AddParagraph(ParagraphCommand {
            runs,
            alignment: Alignment::Left,
            indent: self.options.tier_indent(tier),
            font_size: self.options.font_size,
        })
    }

    /// The unused header label as a standalone paragraph.
    fn label_paragraph(&mut self) -> Option<RenderCommand> {
        self.prefix.as_ref()?;
        Some(self.paragraph(Vec::new(), self.root_tier))
    }

    fn visit(&mut self, frame: Frame<'a>) -> Result<Option<RenderCommand>> {
        if frame.depth >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: frame.path,
                limit: self.options.max_depth,
            });
        }

        let command = match frame.node {
            ContentNode::Paragraph(children) => {
                self.push_children(&frame, true);
                Some(self.paragraph(runs_of(children), frame.tier))
            }
            ContentNode::ListItem(children) => {
                self.push_children(&frame, true);
                let runs = runs_of(children);
                if runs.is_empty() {
                    None
                } else {
                    Some(self.paragraph(runs, frame.tier))
                }
            }
            ContentNode::Table(_) => SpecTableTransformer::new(self.options)
                .transform(frame.node, &frame.path)?
                .map(RenderCommand::AddTable),
            ContentNode::TableRow(_) | ContentNode::TableCell { .. } => {
                return Err(Error::malformed(
                    frame.path,
                    format!("`{}` outside of a table", frame.node.kind().name()),
                ));
            }
            ContentNode::Document(_) => {
                self.push_children(&frame, false);
                None
            }
            ContentNode::Text { .. } => {
                let runs = runs_of(std::slice::from_ref(frame.node));
                Some(self.paragraph(runs, frame.tier))
            }
            ContentNode::Image { src } => Some(RenderCommand::AddImage {
                source: src.clone(),
                width: self.options.inline_image_width,
            }),
        };
        Ok(command)
    }
}

impl<'a> Iterator for ContentWalker<'a> {
    type Item = Result<RenderCommand>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(command) = self.pending.take() {
            return Some(Ok(command));
        }
        while let Some(frame) = self.stack.pop() {
            match self.visit(frame) {
                Ok(Some(command)) => {
                    if command.as_paragraph().is_none() {
                        if let Some(label) = self.label_paragraph() {
                            self.pending = Some(command);
                            return Some(Ok(label));
                        }
                    }
                    return Some(Ok(command));
                }
                Ok(None) => continue,
                Err(e) => {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }
        self.label_paragraph().map(Ok)
    }
}

impl std::iter::FusedIterator for ContentWalker<'_> {}

/// Walk `node` at `tier` and collect the commands.
pub fn walk(node: &ContentNode, tier: u32, options: &RenderOptions) -> Result<Vec<RenderCommand>> {
    ContentWalker::new(node, tier, options).collect()
}
