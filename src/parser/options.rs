//! Parsing options and configuration.

/// Default maximum nesting depth of a content tree.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for reading editor content trees.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Maximum nesting depth before the tree is rejected
    pub max_depth: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (read unknown node types as containers).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unknown or malformed node
    #[default]
    Strict,
    /// Read unknown containers as plain containers, skip unknown leaves
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().lenient().with_max_depth(0);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.max_depth, 1);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
