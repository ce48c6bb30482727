/// A stored document: field name to scalar value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Numeric profile identifier, derived from the image file stem.
pub type ProfileNumber = u32;
