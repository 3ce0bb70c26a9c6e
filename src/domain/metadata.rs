//! Descriptive attributes of a guide.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{timestamp, DomainError};

pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_DIFFICULTY: &str = "Beginner";

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

/// `MAJOR.MINOR.PATCH` with non-negative components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    /// Next version, or `None` when the bumped component would overflow.
    pub fn bump(self, bump: VersionBump) -> Option<Self> {
        Some(match bump {
            VersionBump::Major => Self {
                major: self.major.checked_add(1)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Self {
                major: self.major,
                minor: self.minor.checked_add(1)?,
                patch: 0,
            },
            VersionBump::Patch => Self {
                patch: self.patch.checked_add(1)?,
                ..self
            },
        })
    }
}

impl FromStr for SemVer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidVersion(s.to_string());
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let parse = |p: &str| p.trim().parse::<u64>().map_err(|_| invalid());
        Ok(Self {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: parse(parts[2])?,
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionBump {
    Major,
    Minor,
    #[default]
    Patch,
}

/// Guide metadata. Serialized next to the node graph but never consulted by
/// the graph algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideMetadata {
    pub title: String,
    pub description: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "Utc::now", with = "timestamp")]
    pub created_date: DateTime<Utc>,
    #[serde(default = "Utc::now", with = "timestamp")]
    pub last_modified_date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: String,
    #[serde(default)]
    pub estimated_time_minutes: Option<u32>,
}

impl GuideMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            description: description.into(),
            author: default_author(),
            version: default_version(),
            created_date: now,
            last_modified_date: now,
            tags: Vec::new(),
            difficulty_level: default_difficulty(),
            estimated_time_minutes: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn update_modified_date(&mut self) {
        self.last_modified_date = Utc::now();
        debug!("updated modified date for guide '{}'", self.title);
    }

    /// Add a tag unless already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            debug!("added tag '{}' to guide '{}'", tag, self.title);
            self.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(pos) => {
                self.tags.remove(pos);
                debug!("removed tag '{}' from guide '{}'", tag, self.title);
                true
            }
            None => false,
        }
    }

    /// Bump the version. A version that does not parse, or whose bumped
    /// component would not fit in a `u64`, is reset to `1.0.0` without
    /// touching the modified date and without reporting an error.
    pub fn increment_version(&mut self, bump: VersionBump) {
        let next = self
            .version
            .parse::<SemVer>()
            .and_then(|current| {
                current
                    .bump(bump)
                    .ok_or_else(|| DomainError::InvalidVersion(self.version.clone()))
            });
        match next {
            Ok(next) => {
                self.version = next.to_string();
                self.update_modified_date();
                info!("guide '{}' is now version {}", self.title, self.version);
            }
            Err(e) => {
                warn!("{}, resetting to {}", e, DEFAULT_VERSION);
                self.version = default_version();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", VersionBump::Patch, "1.2.4")]
    #[case("1.2.3", VersionBump::Minor, "1.3.0")]
    #[case("1.2.3", VersionBump::Major, "2.0.0")]
    #[case("0.9.9", VersionBump::Patch, "0.9.10")]
    #[case("abc", VersionBump::Patch, "1.0.0")]
    #[case("1.2", VersionBump::Major, "1.0.0")]
    #[case("1.x.3", VersionBump::Minor, "1.0.0")]
    #[case("1.2.-3", VersionBump::Patch, "1.0.0")]
    #[case("18446744073709551615.2.3", VersionBump::Major, "1.0.0")]
    #[case("18446744073709551615.2.3", VersionBump::Minor, "18446744073709551615.3.0")]
    #[case("4.5.18446744073709551615", VersionBump::Patch, "1.0.0")]
    #[case("99999999999999999999.0.0", VersionBump::Patch, "1.0.0")]
    fn given_version_when_incrementing_then_matches_expected(
        #[case] version: &str,
        #[case] bump: VersionBump,
        #[case] expected: &str,
    ) {
        let mut meta = GuideMetadata::new("t", "d");
        meta.version = version.to_string();
        meta.increment_version(bump);
        assert_eq!(meta.version, expected);
    }

    #[test]
    fn given_malformed_version_when_incrementing_then_modified_date_untouched() {
        let mut meta = GuideMetadata::new("t", "d");
        meta.version = "garbage".into();
        let before = meta.last_modified_date;

        meta.increment_version(VersionBump::Patch);

        assert_eq!(meta.last_modified_date, before);
    }

    #[test]
    fn given_component_at_limit_when_incrementing_then_reset_without_touching_modified_date() {
        let mut meta = GuideMetadata::new("t", "d");
        meta.version = format!("1.{}.0", u64::MAX);
        let before = meta.last_modified_date;

        meta.increment_version(VersionBump::Minor);

        assert_eq!(meta.version, DEFAULT_VERSION);
        assert_eq!(meta.last_modified_date, before);
    }

    #[test]
    fn given_valid_version_when_incrementing_then_touches_modified_date() {
        let mut meta = GuideMetadata::new("t", "d");
        let before = meta.last_modified_date;

        meta.increment_version(VersionBump::Minor);

        assert!(meta.last_modified_date >= before);
        assert_eq!(meta.version, "1.1.0");
    }

    #[test]
    fn given_duplicate_tag_when_adding_then_kept_once() {
        let mut meta = GuideMetadata::new("t", "d");
        meta.add_tag("wifi");
        meta.add_tag("toaster");
        meta.add_tag("wifi");
        assert_eq!(meta.tags, vec!["wifi", "toaster"]);
    }

    #[test]
    fn given_tags_when_removing_then_reports_presence() {
        let mut meta = GuideMetadata::new("t", "d");
        meta.add_tag("wifi");
        assert!(meta.remove_tag("wifi"));
        assert!(!meta.remove_tag("wifi"));
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn given_minimal_json_when_deserializing_then_defaults_apply() {
        let meta: GuideMetadata =
            serde_json::from_str(r#"{"title": "T", "description": "D"}"#).unwrap();
        assert_eq!(meta.author, DEFAULT_AUTHOR);
        assert_eq!(meta.version, DEFAULT_VERSION);
        assert_eq!(meta.difficulty_level, DEFAULT_DIFFICULTY);
        assert!(meta.estimated_time_minutes.is_none());
    }

    #[test]
    fn given_json_without_title_when_deserializing_then_fails() {
        let result: Result<GuideMetadata, _> = serde_json::from_str(r#"{"description": "D"}"#);
        assert!(result.is_err());
    }
}
