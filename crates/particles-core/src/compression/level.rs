use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Requested reduction, one of 10, 20, ..., 90 percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 90;
    pub const STEP: u8 = 10;

    /// 50%, halving the article
    pub const DEFAULT: CompressionLevel = CompressionLevel(50);

    pub fn new(pct: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&pct) && pct % Self::STEP == 0 {
            Ok(Self(pct))
        } else {
            Err(Error::InvalidInput(format!(
                "compression level must be one of {}, got {}",
                Self::allowed_values_display(),
                pct
            )))
        }
    }

    /// Every valid level in ascending order
    pub fn all() -> impl Iterator<Item = CompressionLevel> {
        (Self::MIN..=Self::MAX)
            .step_by(Self::STEP as usize)
            .map(CompressionLevel)
    }

    /// Reduction percentage
    pub fn pct(self) -> u8 {
        self.0
    }

    /// Percentage of the original length that is kept
    pub fn kept_pct(self) -> u8 {
        100 - self.0
    }

    fn allowed_values_display() -> String {
        Self::all()
            .map(|l| l.0.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = Error;

    fn try_from(pct: u8) -> Result<Self> {
        Self::new(pct)
    }
}

impl From<CompressionLevel> for u8 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

impl FromStr for CompressionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_end_matches('%');
        let pct: u8 = trimmed
            .parse()
            .map_err(|_| Error::InvalidInput(format!("'{}' is not a compression level", s)))?;
        Self::new(pct)
    }
}
