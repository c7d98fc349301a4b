use chrono::{Datelike, NaiveDate};
use semver::Version;

use crate::error::{Error, Result};

/// Release date format on download pages, e.g. `15-Jan-2023`.
pub const RELEASE_DATE_FORMAT: &str = "%d-%b-%Y";

/// One downloadable release as listed on a product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub description: String,
    pub released: NaiveDate,
    pub url: String,
}

impl VersionEntry {
    pub fn new(description: impl Into<String>, released: NaiveDate, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            released,
            url: url.into(),
        }
    }

    /// Builds an entry from raw page attributes.
    pub fn from_attributes(description: &str, release_date: &str, url: &str) -> Result<Self> {
        let released = parse_release_date(release_date)?;
        Ok(Self::new(description.trim(), released, url.trim()))
    }

    /// `"{description} ({yyyy}-{mm})"`.
    pub fn directory_name(&self) -> String {
        format!(
            "{} ({}-{:02})",
            self.description,
            self.released.year(),
            self.released.month()
        )
    }
}

pub fn parse_release_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), RELEASE_DATE_FORMAT)
        .map_err(|e| Error::navigation(format!("invalid release date {value:?}: {e}")))
}

/// Parses a button's version tag.
///
/// Strict semver first; otherwise the leading numeric components, with missing
/// minor/patch taken as zero (`"8.5"` is `8.5.0`). Components past the third are ignored.
pub fn parse_version_tag(tag: &str) -> Option<Version> {
    let tag = tag.trim();
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    if let Ok(version) = Version::parse(tag) {
        return Some(version);
    }

    let core = tag.split(['-', '+']).next()?;
    let mut numbers = [0u64; 3];
    let mut parts = core.split('.');
    for (i, slot) in numbers.iter_mut().enumerate() {
        match parts.next() {
            Some(part) => *slot = part.parse().ok()?,
            None if i > 0 => break,
            None => return None,
        }
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Index of the highest parsable tag. Ties keep the first occurrence.
pub fn latest_index<S: AsRef<str>>(tags: &[S]) -> Option<usize> {
    let mut best: Option<(usize, Version)> = None;
    for (i, tag) in tags.iter().enumerate() {
        let tag: &str = tag.as_ref();
        let Some(version) = parse_version_tag(tag) else {
            tracing::warn!(tag, "skipping unparsable version tag");
            continue;
        };
        if best.as_ref().map_or(true, |(_, current)| version > *current) {
            best = Some((i, version));
        }
    }
    best.map(|(i, _)| i)
}
