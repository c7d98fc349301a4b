//! Byte-count magnitudes used by the progress line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    B,
    KB,
    MB,
    GB,
}

impl Unit {
    /// Strictly increasing thresholds.
    pub const ALL: [Unit; 4] = [Unit::B, Unit::KB, Unit::MB, Unit::GB];

    pub const fn size(self) -> u64 {
        match self {
            Unit::B => 1,
            Unit::KB => 1024,
            Unit::MB => 1024 * 1024,
            Unit::GB => 1024 * 1024 * 1024,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Unit::B => "B",
            Unit::KB => "KB",
            Unit::MB => "MB",
            Unit::GB => "GB",
        }
    }

    pub const fn speed_label(self) -> &'static str {
        match self {
            Unit::B => "B/s",
            Unit::KB => "KB/s",
            Unit::MB => "MB/s",
            Unit::GB => "GB/s",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Picks the display unit for `bytes`.
///
/// Adjacent bands share their boundary: exactly 1024² reports as KB and
/// exactly 1024³ as MB, because the lower band is checked first.
pub fn classify(bytes: f64) -> Unit {
    let kb = Unit::KB.size() as f64;
    let mb = Unit::MB.size() as f64;
    let gb = Unit::GB.size() as f64;

    if bytes < kb {
        Unit::B
    } else if (kb..=mb).contains(&bytes) {
        Unit::KB
    } else if (mb..=gb).contains(&bytes) {
        Unit::MB
    } else {
        Unit::GB
    }
}

pub fn scale(bytes: f64, unit: Unit) -> f64 {
    bytes / unit.size() as f64
}

/// `bytes` expressed in its own classified unit.
pub fn humanize(bytes: f64) -> (f64, Unit) {
    let unit = classify(bytes);
    (scale(bytes, unit), unit)
}
