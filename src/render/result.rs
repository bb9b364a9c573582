//! Render statistics.

use serde::{Deserialize, Serialize};

use super::{RenderCommand, RenderSink};
use crate::error::Result;

/// Statistics collected while a report streams to its sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of paragraphs emitted
    pub paragraph_count: u32,

    /// Number of tables emitted
    pub table_count: u32,

    /// Number of merge regions across all tables
    pub merge_count: u32,

    /// Number of images emitted
    pub image_count: u32,

    /// Number of page fields inserted
    pub page_field_count: u32,

    /// Number of template runs substituted
    pub substitution_count: u32,

    /// Whether a protection command was emitted
    pub protected: bool,

    /// Number of steps rendered with the empty sentinel
    pub empty_step_count: u32,

    /// Character count of paragraph text (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one command.
    pub fn record(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::AddParagraph(p) => {
                self.paragraph_count += 1;
                self.count_text(&p.plain_text());
            }
            RenderCommand::AddTable(t) => {
                self.table_count += 1;
                self.merge_count += t.merges.len() as u32;
            }
            RenderCommand::AddImage { .. } => self.image_count += 1,
            RenderCommand::SetHeaderField { .. } => self.page_field_count += 1,
            RenderCommand::SubstituteText { .. } => self.substitution_count += 1,
            RenderCommand::SetProtection { .. } => self.protected = true,
        }
    }

    /// Add character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.merge_count += other.merge_count;
        self.image_count += other.image_count;
        self.page_field_count += other.page_field_count;
        self.substitution_count += other.substitution_count;
        self.protected |= other.protected;
        self.empty_step_count += other.empty_step_count;
        self.char_count += other.char_count;
    }
}

/// Sink adapter that records statistics on the way through.
pub struct StatsSink<S> {
    inner: S,
    stats: RenderStats,
}

impl<S: RenderSink> StatsSink<S> {
    /// Wrap a sink.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: RenderStats::new(),
        }
    }

    /// Statistics so far.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Mutable statistics, for counters the command stream cannot show.
    pub fn stats_mut(&mut self) -> &mut RenderStats {
        &mut self.stats
    }

    /// Unwrap into the inner sink and the statistics.
    pub fn into_parts(self) -> (S, RenderStats) {
        (self.inner, self.stats)
    }
}

impl<S: RenderSink> RenderSink for StatsSink<S> {
    fn emit(&mut self, command: RenderCommand) -> Result<()> {
        self.stats.record(&command);
        self.inner.emit(command)
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Alignment, ParagraphCommand, ProtectionMode, Run};

    #[test]
    fn test_stats_sink_records() {
        let mut sink = StatsSink::new(Vec::new());
        sink.emit(RenderCommand::AddParagraph(ParagraphCommand {
            runs: vec![Run::new("Hello, world!")],
            alignment: Alignment::Left,
            indent: 0.0,
            font_size: 12.0,
        }))
        .unwrap();
        sink.emit(RenderCommand::SetProtection {
            hash: "C665".into(),
            mode: ProtectionMode::FormsOnly,
        })
        .unwrap();

        let (commands, stats) = sink.into_parts();
        assert_eq!(commands.len(), 2);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.char_count, 12);
        assert!(stats.protected);
    }

    #[test]
    fn test_render_stats_merge() {
        let mut stats1 = RenderStats::new();
        stats1.paragraph_count = 5;
        stats1.table_count = 2;

        let stats2 = RenderStats {
            paragraph_count: 3,
            table_count: 1,
            image_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.table_count, 3);
        assert_eq!(stats1.image_count, 4);
        assert!(!stats1.protected);
    }
}
