//! Server version parsing and comparison

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Why the server version could not be determined
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Unable to determine the server version: the `version` variable was not collected.")]
    Unknown,

    #[error("Unable to determine the server version: '{0}' is not a dotted version string.")]
    Unparseable(String),
}

/// A dotted numeric server version such as `8.0.13-log`
///
/// Ordering and equality look at the numeric segments only; missing
/// segments count as zero. The raw string is kept for display.
#[derive(Debug, Clone)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    raw: String,
}

impl ServerVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            raw: format!("{}.{}.{}", major, minor, patch),
        }
    }

    /// Version string as reported by the server
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn segments(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("version pattern is valid")
    })
}

impl FromStr for ServerVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || VersionError::Unparseable(s.to_string());
        let captures = version_pattern().captures(s).ok_or_else(unparseable)?;

        let segment = |i: usize| -> Result<u32, VersionError> {
            captures
                .get(i)
                .map(|m| m.as_str().parse::<u32>().map_err(|_| unparseable()))
                .unwrap_or(Ok(0))
        };

        Ok(Self {
            major: segment(1)?,
            minor: segment(2)?,
            patch: segment(3)?,
            raw: s.trim().to_string(),
        })
    }
}

impl PartialEq for ServerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for ServerVersion {}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments().cmp(&other.segments())
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
