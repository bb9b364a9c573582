//! Rendering options and configuration.

use crate::parser::DEFAULT_MAX_DEPTH;

/// Options for rendering report content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Body font size in points
    pub font_size: f32,

    /// Indent added per content tier in points
    pub base_indent: f32,

    /// Width of the body cell images are laid out in, in points
    pub cell_width: f32,

    /// Margin subtracted from half the cell width for step pictures
    pub image_margin: f32,

    /// Width of images found inside content trees, in points
    pub inline_image_width: f32,

    /// Sentinel rendered for steps without data
    pub empty_sentinel: String,

    /// Prefix of the program-code summary line of parameter steps
    pub program_label: String,

    /// Maximum content tree depth accepted by the walker
    pub max_depth: usize,

    /// Header labels of the five limit columns
    pub spec_labels: SpecLabels,

    /// Titles of the three derived columns
    pub derived_titles: DerivedTitles,

    /// Header labels recognised as the slot/tank column
    pub slot_labels: Vec<String>,

    /// Header labels recognised as the sequence-number column
    pub sequence_labels: Vec<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the indent added per tier.
    pub fn with_base_indent(mut self, indent: f32) -> Self {
        self.base_indent = indent;
        self
    }

    /// Set the cell width used to size step pictures.
    pub fn with_cell_width(mut self, width: f32) -> Self {
        self.cell_width = width;
        self
    }

    /// Set the picture margin.
    pub fn with_image_margin(mut self, margin: f32) -> Self {
        self.image_margin = margin;
        self
    }

    /// Set the sentinel for empty steps.
    pub fn with_empty_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.empty_sentinel = sentinel.into();
        self
    }

    /// Set the maximum content depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set the limit column labels.
    pub fn with_spec_labels(mut self, labels: SpecLabels) -> Self {
        self.spec_labels = labels;
        self
    }

    /// Set the derived column titles.
    pub fn with_derived_titles(mut self, titles: DerivedTitles) -> Self {
        self.derived_titles = titles;
        self
    }

    /// Set the slot column labels.
    pub fn with_slot_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.slot_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the sequence-number column labels.
    pub fn with_sequence_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.sequence_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Left indent for a content tier: `base_indent × max(0, tier - 1)`.
    pub fn tier_indent(&self, tier: u32) -> f32 {
        self.base_indent * tier.saturating_sub(1) as f32
    }

    /// Indent of attribute-sourced step text (twice the font size).
    pub fn attribute_indent(&self) -> f32 {
        self.font_size * 2.0
    }

    /// Width of a step picture: half the cell width minus the margin.
    pub fn picture_width(&self) -> f32 {
        (self.cell_width / 2.0 - self.image_margin).max(0.0)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            base_indent: 21.0,
            cell_width: 481.9,
            image_margin: 10.0,
            inline_image_width: 220.0,
            empty_sentinel: "N/A".to_string(),
            program_label: "Program".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            spec_labels: SpecLabels::default(),
            derived_titles: DerivedTitles::default(),
            slot_labels: vec!["Slot".to_string(), "Tank".to_string()],
            sequence_labels: vec!["No".to_string(), "No.".to_string(), "#".to_string()],
        }
    }
}

/// Header labels of the five limit columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLabels {
    /// Lower specification limit
    pub lower_spec_limit: String,
    /// Lower operating limit
    pub lower_operating_limit: String,
    /// Set point
    pub set_point: String,
    /// Upper operating limit
    pub upper_operating_limit: String,
    /// Upper specification limit
    pub upper_spec_limit: String,
}

impl SpecLabels {
    /// Labels in canonical order: LSL, LOL, SP, UOL, USL.
    pub fn as_array(&self) -> [&str; 5] {
        [
            &self.lower_spec_limit,
            &self.lower_operating_limit,
            &self.set_point,
            &self.upper_operating_limit,
            &self.upper_spec_limit,
        ]
    }
}

impl Default for SpecLabels {
    fn default() -> Self {
        Self {
            lower_spec_limit: "Lower Spec Limit".to_string(),
            lower_operating_limit: "Lower Operating Limit".to_string(),
            set_point: "Set Point".to_string(),
            upper_operating_limit: "Upper Operating Limit".to_string(),
            upper_spec_limit: "Upper Spec Limit".to_string(),
        }
    }
}

/// Titles of the three derived columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTitles {
    /// Set value column
    pub set_value: String,
    /// Operating value column
    pub operating_value: String,
    /// Spec value column
    pub spec_value: String,
}

impl Default for DerivedTitles {
    fn default() -> Self {
        Self {
            set_value: "Set Value".to_string(),
            operating_value: "Operating Value".to_string(),
            spec_value: "Spec Value".to_string(),
        }
    }
}
