//! Limit table restructuring.
//!
//! Process parameter tables arrive from the editor with five limit columns
//! (lower spec, lower operating, set point, upper operating, upper spec).
//! The report prints them as three derived columns instead:
//!
//! | before                                   | after                       |
//! |------------------------------------------|-----------------------------|
//! | `No │ Tank │ LSL │ LOL │ SP │ UOL │ USL` | `No │ Tank │ Set │ Op │ Spec` |
//!
//! Operating and spec values are tolerance strings built by
//! [`compose`](crate::compose::compose). Consecutive rows sharing the same
//! slot (tank) value form one group: the slot cell and the sequence-number
//! cell are merged vertically across it, and the sequence number counts
//! groups rather than rows.
//!
//! Tables without all five limit labels are copied verbatim.

use unicode_normalization::UnicodeNormalization;

use super::command::{CellStyle, Merge, Run, TableCellCommand, TableCommand};
use super::RenderOptions;
use crate::compose::compose;
use crate::error::{Error, Result};
use crate::model::{ContentNode, MarkColor};

/// A maximal run of consecutive rows sharing one slot value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRun {
    /// Shared slot value
    pub value: String,
    /// Index of the first row of the run (body coordinates)
    pub start: usize,
    /// Number of rows in the run
    pub len: usize,
}

impl GroupRun {
    /// Index of the last row of the run.
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Split slot values into runs of equal consecutive values.
///
/// Values are compared after trimming. The trailing run is always closed.
pub fn group_runs<S: AsRef<str>>(values: &[S]) -> Vec<GroupRun> {
    let mut runs: Vec<GroupRun> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let value = value.as_ref().trim();
        match runs.last_mut() {
            Some(run) if run.value == value => run.len += 1,
            _ => runs.push(GroupRun {
                value: value.to_string(),
                start: i,
                len: 1,
            }),
        }
    }
    runs
}

/// Per-row sequence numbers: 1-based group index of each row.
pub fn sequence_numbers(runs: &[GroupRun]) -> Vec<usize> {
    runs.iter()
        .enumerate()
        .flat_map(|(group, run)| std::iter::repeat(group + 1).take(run.len))
        .collect()
}

/// Normalize a header label for comparison.
fn normalize_label(text: &str) -> String {
    text.nfkc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Column indices of the five limit labels in a header row.
///
/// `limits` holds every header cell matching one of the labels, so a
/// repeated label is dropped along with the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SpecColumns {
    lower_spec: usize,
    lower_operating: usize,
    set_point: usize,
    upper_operating: usize,
    upper_spec: usize,
    limits: Vec<usize>,
}

impl SpecColumns {
    fn locate(header: &[String], options: &RenderOptions) -> Option<Self> {
        let labels = options.spec_labels.as_array().map(normalize_label);
        let find = |label: &String| header.iter().position(|h| h == label);
        let [lsl, lol, sp, uol, usl] = &labels;
        let limits = header
            .iter()
            .enumerate()
            .filter(|(_, h)| labels.contains(*h))
            .map(|(i, _)| i)
            .collect();
        Some(Self {
            lower_spec: find(lsl)?,
            lower_operating: find(lol)?,
            set_point: find(sp)?,
            upper_operating: find(uol)?,
            upper_spec: find(usl)?,
            limits,
        })
    }

    fn insert_at(&self) -> usize {
        self.limits.iter().copied().min().unwrap_or(0)
    }

    fn contains(&self, column: usize) -> bool {
        self.limits.contains(&column)
    }
}

/// A column of the restructured table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputColumn {
    Source(usize),
    SetValue,
    OperatingValue,
    SpecValue,
}

/// Text and first mark color of a source cell.
#[derive(Debug, Clone, Default)]
struct CellValue {
    text: String,
    color: Option<MarkColor>,
}

impl CellValue {
    fn read(cell: Option<&ContentNode>) -> Self {
        let Some(cell) = cell else {
            return Self::default();
        };
        let mut value = Self {
            text: cell.plain_text().trim().to_string(),
            color: first_mark_color(cell),
        };
        if let ContentNode::TableCell {
            dropdown: Some(dropdown),
            ..
        } = cell
        {
            if value.text.is_empty() {
                value.text = dropdown.value.trim().to_string();
            }
            if value.color.is_none() {
                value.color = dropdown.color;
            }
        }
        value
    }

    fn is_flagged(&self) -> bool {
        self.color == Some(MarkColor::Red)
    }
}

fn first_mark_color(node: &ContentNode) -> Option<MarkColor> {
    match node {
        ContentNode::Text { mark, .. } => mark.map(|m| m.color),
        other => other.children().iter().find_map(first_mark_color),
    }
}

/// Copy the content of a source cell into paragraphs of runs and images.
fn copy_content(node: &ContentNode, paragraphs: &mut Vec<Vec<Run>>, images: &mut Vec<String>) {
    match node {
        ContentNode::Text { .. } => paragraphs.push(runs_of(std::slice::from_ref(node))),
        ContentNode::Image { src } => images.push(src.clone()),
        ContentNode::Paragraph(children) | ContentNode::ListItem(children) => {
            paragraphs.push(runs_of(children));
            for child in children.iter().filter(|c| !c.is_leaf()) {
                copy_content(child, paragraphs, images);
            }
            images.extend(children.iter().filter_map(|c| match c {
                ContentNode::Image { src } => Some(src.clone()),
                _ => None,
            }));
        }
        other => {
            for child in other.children() {
                copy_content(child, paragraphs, images);
            }
        }
    }
}

/// Runs of the direct text children of a block.
pub(crate) fn runs_of(children: &[ContentNode]) -> Vec<Run> {
    children
        .iter()
        .filter_map(|child| match child {
            ContentNode::Text { text, mark } => Some(Run {
                text: text.clone(),
                color: mark.map(|m| m.color).unwrap_or_default(),
                underline: mark.map(|m| m.underline).unwrap_or(false),
                bold: false,
            }),
            _ => None,
        })
        .collect()
}

fn copy_cell(cell: Option<&ContentNode>, style: CellStyle) -> TableCellCommand {
    let mut out = TableCellCommand::empty(style);
    let Some(cell) = cell else {
        return out;
    };
    for child in cell.children() {
        copy_content(child, &mut out.paragraphs, &mut out.images);
    }
    if let ContentNode::TableCell {
        dropdown: Some(dropdown),
        ..
    } = cell
    {
        if out.plain_text().trim().is_empty() {
            out.paragraphs = vec![vec![Run::colored(
                dropdown.value.clone(),
                dropdown.color.unwrap_or_default(),
            )]];
        }
    }
    out
}

/// Restructures limit tables and copies all other tables verbatim.
#[derive(Debug, Clone, Copy)]
pub struct SpecTableTransformer<'a> {
    options: &'a RenderOptions,
}

impl<'a> SpecTableTransformer<'a> {
    /// Create a transformer.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    /// Transform a `Table` node found at `path`.
    ///
    /// Returns `Ok(None)` when there is nothing to render: no rows, a header
    /// row without text, or no data rows.
    pub fn transform(&self, table: &ContentNode, path: &str) -> Result<Option<TableCommand>> {
        let rows = table_rows(table, path)?;
        let Some((header, body)) = rows.split_first() else {
            log::debug!("Table at {} has no rows, skipping", path);
            return Ok(None);
        };
        if header.is_empty() || body.is_empty() {
            log::debug!("Table at {} has no header cells or no data rows, skipping", path);
            return Ok(None);
        }

        let header_texts: Vec<String> = header
            .iter()
            .map(|c| normalize_label(&c.plain_text()))
            .collect();
        if header_texts.iter().all(String::is_empty) {
            log::debug!("Table at {} has a blank header row, skipping", path);
            return Ok(None);
        }

        let table = match SpecColumns::locate(&header_texts, self.options) {
            Some(spec) => self.restructure(&header_texts, header, body, spec),
            None => self.verbatim(&rows),
        };
        Ok(Some(table))
    }

    fn verbatim(&self, rows: &[&[ContentNode]]) -> TableCommand {
        TableCommand {
            columns: rows[0].iter().map(|c| c.plain_text()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| copy_cell(Some(cell), CellStyle::default()))
                        .collect()
                })
                .collect(),
            header_rows: 1,
            merges: Vec::new(),
        }
    }

    fn find_column(&self, header: &[String], labels: &[String], spec: &SpecColumns) -> Option<usize> {
        let labels: Vec<String> = labels.iter().map(|l| normalize_label(l)).collect();
        header
            .iter()
            .enumerate()
            .find(|(i, h)| !spec.contains(*i) && labels.contains(h))
            .map(|(i, _)| i)
    }

    fn restructure(
        &self,
        header_texts: &[String],
        header: &[ContentNode],
        body: &[&[ContentNode]],
        spec: SpecColumns,
    ) -> TableCommand {
        let insert_at = spec.insert_at();
        log::debug!(
            "Limit table detected, inserting derived columns at {}",
            insert_at
        );

        let mut plan = Vec::with_capacity(header.len() + 3);
        for i in 0..header.len() {
            if i == insert_at {
                plan.extend([
                    OutputColumn::SetValue,
                    OutputColumn::OperatingValue,
                    OutputColumn::SpecValue,
                ]);
            }
            if !spec.contains(i) {
                plan.push(OutputColumn::Source(i));
            }
        }

        let slot = self.find_column(header_texts, &self.options.slot_labels, &spec);
        let sequence = self.find_column(header_texts, &self.options.sequence_labels, &spec);

        let runs = match slot {
            Some(col) => {
                let values: Vec<String> = body
                    .iter()
                    .map(|row| CellValue::read(row.get(col)).text)
                    .collect();
                group_runs(&values)
            }
            None => (0..body.len())
                .map(|i| GroupRun {
                    value: String::new(),
                    start: i,
                    len: 1,
                })
                .collect(),
        };

        let titles = &self.options.derived_titles;
        let header_row: Vec<TableCellCommand> = plan
            .iter()
            .map(|column| {
                let style = CellStyle::centered();
                match column {
                    OutputColumn::Source(i) => copy_cell(header.get(*i), style),
                    OutputColumn::SetValue => {
                        TableCellCommand::text(titles.set_value.clone(), MarkColor::Black, style)
                    }
                    OutputColumn::OperatingValue => TableCellCommand::text(
                        titles.operating_value.clone(),
                        MarkColor::Black,
                        style,
                    ),
                    OutputColumn::SpecValue => {
                        TableCellCommand::text(titles.spec_value.clone(), MarkColor::Black, style)
                    }
                }
            })
            .collect();

        let mut rows = Vec::with_capacity(body.len() + 1);
        let columns = header_row.iter().map(|c| c.plain_text()).collect();
        rows.push(header_row);

        let merged_style = CellStyle {
            keep_together: false,
            ..CellStyle::centered()
        };

        for (group, run) in runs.iter().enumerate() {
            for r in run.start..run.start + run.len {
                let row = body[r];
                let first_of_run = r == run.start;
                let set = CellValue::read(row.get(spec.set_point));

                let cells = plan
                    .iter()
                    .map(|column| match *column {
                        OutputColumn::Source(i) if Some(i) == slot => {
                            if first_of_run {
                                let value = CellValue::read(row.get(i));
                                TableCellCommand::text(
                                    value.text,
                                    value.color.unwrap_or_default(),
                                    merged_style,
                                )
                            } else {
                                TableCellCommand::empty(merged_style)
                            }
                        }
                        OutputColumn::Source(i) if Some(i) == sequence => {
                            if first_of_run {
                                TableCellCommand::text(
                                    (group + 1).to_string(),
                                    MarkColor::Black,
                                    merged_style,
                                )
                            } else {
                                TableCellCommand::empty(merged_style)
                            }
                        }
                        OutputColumn::Source(i) => copy_cell(row.get(i), CellStyle::centered()),
                        OutputColumn::SetValue => TableCellCommand::text(
                            set.text.clone(),
                            set.color.unwrap_or_default(),
                            CellStyle::centered(),
                        ),
                        OutputColumn::OperatingValue => self.derived_cell(
                            &set,
                            &CellValue::read(row.get(spec.upper_operating)),
                            &CellValue::read(row.get(spec.lower_operating)),
                        ),
                        OutputColumn::SpecValue => self.derived_cell(
                            &set,
                            &CellValue::read(row.get(spec.upper_spec)),
                            &CellValue::read(row.get(spec.lower_spec)),
                        ),
                    })
                    .collect();
                rows.push(cells);
            }
        }

        let mut merges = Vec::new();
        let merge_columns: Vec<usize> = plan
            .iter()
            .enumerate()
            .filter(|(_, c)| match c {
                OutputColumn::Source(i) => Some(*i) == slot || Some(*i) == sequence,
                _ => false,
            })
            .map(|(out, _)| out)
            .collect();
        if slot.is_some() {
            for run in runs.iter().filter(|r| r.len > 1) {
                for &column in &merge_columns {
                    merges.push(Merge::vertical(column, run.start + 1, run.end() + 1));
                }
            }
        }

        TableCommand {
            columns,
            rows,
            header_rows: 1,
            merges,
        }
    }

    fn derived_cell(&self, set: &CellValue, upper: &CellValue, lower: &CellValue) -> TableCellCommand {
        let value = compose(&set.text, &upper.text, &lower.text);
        if value.is_empty() && !(set.text.is_empty() && upper.text.is_empty() && lower.text.is_empty())
        {
            log::debug!(
                "Could not compose tolerance from set={:?} upper={:?} lower={:?}",
                set.text,
                upper.text,
                lower.text
            );
        }
        let color = if upper.is_flagged() || lower.is_flagged() {
            MarkColor::Red
        } else {
            MarkColor::Black
        };
        TableCellCommand::text(value, color, CellStyle::centered())
    }
}

/// Validate table structure and return the cells of each row.
fn table_rows<'n>(table: &'n ContentNode, path: &str) -> Result<Vec<&'n [ContentNode]>> {
    let ContentNode::Table(rows) = table else {
        return Err(Error::malformed(
            path,
            format!("expected a table, found `{}`", table.kind().name()),
        ));
    };

    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            let row_path = format!("{}.content[{}]", path, r);
            let ContentNode::TableRow(cells) = row else {
                return Err(Error::malformed(
                    row_path,
                    format!("table child must be a row, found `{}`", row.kind().name()),
                ));
            };
            if let Some((c, cell)) = cells
                .iter()
                .enumerate()
                .find(|(_, c)| !matches!(c, ContentNode::TableCell { .. }))
            {
                return Err(Error::malformed(
                    format!("{}.content[{}]", row_path, c),
                    format!("row child must be a cell, found `{}`", cell.kind().name()),
                ));
            }
            Ok(cells.as_slice())
        })
        .collect()
}
