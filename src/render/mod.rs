//! Rendering module: content trees to render commands.

mod command;
mod options;
mod result;
pub mod sink;
pub mod spec_table;
pub mod walker;

pub use command::{
    Alignment, CellStyle, Merge, ParagraphCommand, ProtectionMode, RenderCommand, Run,
    TableCellCommand, TableCommand, VerticalAlignment,
};
pub use options::{DerivedTitles, RenderOptions, SpecLabels};
pub use result::{RenderStats, StatsSink};
pub use sink::{JsonLinesSink, RenderSink};
pub use spec_table::{group_runs, sequence_numbers, GroupRun, SpecTableTransformer};
pub use walker::{walk, ContentWalker};
