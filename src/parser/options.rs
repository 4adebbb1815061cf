//! Parser configuration

/// Switches for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept `$name` / `$name:type` placeholders at category, named parser
    /// and token positions. Used when compiling text quotations.
    pub antiquotations: bool,
    /// Resynchronize after a failed item instead of stopping at the first
    /// error.
    pub recovery: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            antiquotations: false,
            recovery: true,
        }
    }
}

impl ParseOptions {
    /// Options used for quotation templates: placeholders on, recovery off.
    pub fn quotation() -> Self {
        Self {
            antiquotations: true,
            recovery: false,
        }
    }
}
