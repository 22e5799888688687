//! Parsing options.

/// Default limit on nested containers (lists, quotes, tables, cells).
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Options for parsing hypertext documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum nesting of container elements before parsing fails
    pub max_depth: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        assert_eq!(ParseOptions::new().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(ParseOptions::new().with_max_depth(8).max_depth, 8);
    }
}
