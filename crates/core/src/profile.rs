//! Profile identifiers and selection of the next profile to describe.
//!
//! Profiles are images in the storage backend named after a number, e.g.
//! `12.jpg`. The file name is what gets stored in the target field of every
//! record; the number is used to find profiles nobody has described yet.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::ProfileNumber;

/// Default upper bound (inclusive) of the profile number range.
pub const DEFAULT_PROFILES_TOTAL: ProfileNumber = 1000;

/// The profile a labeling session is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRef {
    /// Storage file name, stored verbatim in the target field.
    pub file_name: String,
    /// Number parsed from the file name, when it has one.
    pub number: Option<ProfileNumber>,
}

impl ProfileRef {
    pub fn from_file_name(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let number = parse_profile_number(&file_name).ok();
        Self { file_name, number }
    }
}

/// Parse the profile number from a raw target field value.
///
/// Everything before the first `.` must be a non-negative integer:
/// `"12.jpg"` and `"12"` both yield `12`.
pub fn parse_profile_number(raw: &str) -> Result<ProfileNumber, CoreError> {
    let stem = raw.split('.').next().unwrap_or_default().trim();
    stem.parse::<ProfileNumber>().map_err(|_| {
        CoreError::Validation(format!("'{raw}' does not start with a profile number"))
    })
}

/// Lowest number among `available` that lies in `0..=total` and has not
/// been described.
///
/// `available` holds the numbers of the profiles actually in storage, so gaps
/// in the numbering are skipped. Returns `None` when every candidate is
/// already described; the caller is expected to fall back to a random
/// profile.
pub fn next_undescribed_profile<I>(
    available: I,
    described: &HashSet<ProfileNumber>,
    total: ProfileNumber,
) -> Option<ProfileNumber>
where
    I: IntoIterator<Item = ProfileNumber>,
{
    available
        .into_iter()
        .filter(|n| *n <= total && !described.contains(n))
        .min()
}

/// Guess an image MIME type from the file extension.
pub fn image_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
