use crate::path::DEFAULT_SEPARATOR;

/// Options for a [`Cut`](crate::Cut) proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutOptions {
    /// Delimiter between top-level path segments. Default is `.`.
    pub separator: char,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl CutOptions {
    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }
}
