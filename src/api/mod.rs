// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Policy levels and policy schema versions, plus the pod model in [`core`].

pub mod core;

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Pod Security Level defines the degree of isolation required for pods.
/// Levels are ordered from least to most strict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    /// Privileged - Unrestricted policy, providing the widest possible level of permissions.
    #[default]
    Privileged,
    /// Baseline - Minimally restrictive policy which prevents known privilege escalations.
    Baseline,
    /// Restricted - Heavily restricted policy, following current Pod hardening best practices.
    Restricted,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Privileged => "privileged",
            Level::Baseline => "baseline",
            Level::Restricted => "restricted",
        }
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "privileged" => Ok(Level::Privileged),
            "baseline" => Ok(Level::Baseline),
            "restricted" => Ok(Level::Restricted),
            _ => Err(ParseError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Level {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

/// Version is a policy schema version: `v<major>.<minor>` or `latest`.
///
/// `latest` compares greater than every concrete version, so resolving a check
/// at `latest` always selects its newest implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u32,
    minor: u32,
    latest: bool,
}

impl Version {
    pub const fn major_minor(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            latest: false,
        }
    }

    pub const fn latest() -> Self {
        Self {
            major: 0,
            minor: 0,
            latest: true,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn is_latest(&self) -> bool {
        self.latest
    }

    /// Returns true if this version sorts strictly before `other`.
    pub fn older(&self, other: &Version) -> bool {
        self < other
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.latest, other.latest) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => (self.major, self.minor).cmp(&(other.major, other.minor)),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.latest {
            f.write_str("latest")
        } else {
            write!(f, "v{}.{}", self.major, self.minor)
        }
    }
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "latest" {
            return Ok(Version::latest());
        }
        let invalid = || ParseError::InvalidVersion(s.to_string());
        let (major, minor) = s
            .strip_prefix('v')
            .and_then(|rest| rest.split_once('.'))
            .ok_or_else(invalid)?;
        let major = parse_number(major).ok_or_else(invalid)?;
        let minor = parse_number(minor).ok_or_else(invalid)?;
        // Only the v1 schema exists.
        if major != 1 {
            return Err(invalid());
        }
        Ok(Version::major_minor(major, minor))
    }
}

impl TryFrom<String> for Version {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// LevelVersion pairs a level with the policy version it is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelVersion {
    pub level: Level,
    pub version: Version,
}

impl LevelVersion {
    pub fn new(level: Level, version: Version) -> Self {
        Self { level, version }
    }
}

impl Default for LevelVersion {
    fn default() -> Self {
        Self::new(Level::Privileged, Version::latest())
    }
}

impl fmt::Display for LevelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.version)
    }
}

impl FromStr for LevelVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, version) = s
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidLevelVersion(s.to_string()))?;
        Ok(Self::new(level.parse()?, version.parse()?))
    }
}

impl TryFrom<String> for LevelVersion {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LevelVersion> for String {
    fn from(lv: LevelVersion) -> Self {
        lv.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!("privileged".parse::<Level>(), Ok(Level::Privileged));
        assert_eq!("baseline".parse::<Level>(), Ok(Level::Baseline));
        assert_eq!("restricted".parse::<Level>(), Ok(Level::Restricted));
        assert_eq!("PRIVILEGED".parse::<Level>(), Ok(Level::Privileged));
        assert!("invalid".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Privileged < Level::Baseline);
        assert!(Level::Baseline < Level::Restricted);
        assert_eq!(Level::default(), Level::Privileged);
    }

    #[test]
    fn test_version_ordering() {
        let v1_0 = Version::major_minor(1, 0);
        let v1_8 = Version::major_minor(1, 8);
        let v1_22 = Version::major_minor(1, 22);
        assert!(v1_0 < v1_8);
        assert!(v1_8 < v1_22);
        assert!(v1_22 < Version::latest());
        assert!(v1_0.older(&v1_8));
        assert!(!Version::latest().older(&v1_22));
        assert_eq!(Version::latest().cmp(&Version::latest()), Ordering::Equal);
    }

    #[test]
    fn test_version_parse_and_display() {
        assert_eq!("latest".parse::<Version>(), Ok(Version::latest()));
        assert_eq!("v1.25".parse::<Version>(), Ok(Version::major_minor(1, 25)));
        assert_eq!(Version::major_minor(1, 25).to_string(), "v1.25");
        assert_eq!(Version::latest().to_string(), "latest");

        for bad in ["", "1.25", "v1", "v2.0", "v1.x", "v1.+5", "v1.25.1", "Latest"] {
            assert!(bad.parse::<Version>().is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn test_level_version_round_trip_through_string() {
        let lv: LevelVersion = "restricted:v1.22".parse().unwrap();
        assert_eq!(lv.level, Level::Restricted);
        assert_eq!(lv.version, Version::major_minor(1, 22));
        assert_eq!(lv.to_string(), "restricted:v1.22");
        assert!("restricted".parse::<LevelVersion>().is_err());
        assert!("strict:latest".parse::<LevelVersion>().is_err());
    }

    #[test]
    fn test_serde_uses_string_forms() {
        let json = serde_json::to_string(&LevelVersion::new(Level::Baseline, Version::latest()))
            .unwrap();
        assert_eq!(json, "\"baseline:latest\"");

        let version: Version = serde_json::from_str("\"v1.8\"").unwrap();
        assert_eq!(version, Version::major_minor(1, 8));
        assert!(serde_json::from_str::<Level>("\"unknown\"").is_err());
    }
}
