use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const OBJECT_PREFIX: &str = "cards";
const AUDIO_EXTENSION: &str = "mp3";
const MAX_FILENAME_PART_LENGTH: usize = 120;
const FILENAME_SEPARATOR: &str = "__";

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap());
static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Where a narration lives in the object store, plus a download name for humans.
///
/// `object_path` depends only on the content identifier and is the cache key.
/// `suggested_filename` is cosmetic and never used for lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub object_path: String,
    pub suggested_filename: String,
}

impl ArtifactLocation {
    pub fn locate(id: &str, campaign: &str, title: &str) -> Self {
        Self {
            object_path: object_path(id),
            suggested_filename: format!(
                "{}{sep}{}{sep}{}.{}",
                sanitize_filename_part(campaign),
                sanitize_filename_part(title),
                id,
                AUDIO_EXTENSION,
                sep = FILENAME_SEPARATOR,
            ),
        }
    }
}

pub fn object_path(id: &str) -> String {
    format!("{}/{}.{}", OBJECT_PREFIX, id, AUDIO_EXTENSION)
}

/// Reduce free text to `[A-Za-z0-9_-]`, dropping diacritics first so that
/// "Café" becomes "Cafe" rather than "Caf_".
pub fn sanitize_filename_part(raw: &str) -> String {
    let without_marks: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let replaced = UNSAFE_CHARS.replace_all(without_marks.trim(), "_");
    let collapsed = UNDERSCORE_RUN.replace_all(&replaced, "_");

    // Only ASCII remains, so byte truncation is char-safe.
    let mut part = collapsed.into_owned();
    part.truncate(MAX_FILENAME_PART_LENGTH);
    part
}
