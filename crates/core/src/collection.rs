//! Record store collection names and shared constants.

/// Field used to identify the profile when the metadata collection has none.
pub const DEFAULT_TARGET_FIELD: &str = "Names";

/// Values every stored question accepts.
pub const ANSWER_VALUES: [&str; 2] = ["Yes", "No"];

/// The collections the record store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Labeled profile records.
    Knowledge,
    /// Question catalog.
    Attributes,
    /// Knowledge base metadata (target field).
    Metadata,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Attributes => "attributes",
            Self::Metadata => "metadata",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
