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

//! Error types for check registration and policy string parsing.
//!
//! Policy violations are never errors; they are reported through
//! [`CheckResult`](crate::policy::CheckResult). The errors here are either
//! programming mistakes caught at startup or malformed level/version strings.

use crate::api::Version;
use thiserror::Error;

/// RegistrationError is returned when a check violates a registry invariant.
/// The embedding layer is expected to treat it as fatal during startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("check id must not be empty")]
    EmptyId,

    #[error("check {id} is already registered")]
    DuplicateId { id: String },

    #[error("check {id}: level must be baseline or restricted")]
    InvalidLevel { id: String },

    #[error("check {id}: at least one versioned check is required")]
    NoVersions { id: String },

    #[error("check {id}: minimum version must not be latest")]
    LatestMinimumVersion { id: String },

    /// Versions must be strictly increasing, so equal versions land here too.
    #[error("check {id}: minimum version {current} must be greater than {previous}")]
    NonIncreasingVersion {
        id: String,
        previous: Version,
        current: Version,
    },
}

/// ParseError is returned for malformed level or version strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("must be one of privileged, baseline, restricted: {0:?}")]
    InvalidLevel(String),

    #[error("must be 'latest' or 'v1.x': {0:?}")]
    InvalidVersion(String),

    #[error("must be <level>:<version>: {0:?}")]
    InvalidLevelVersion(String),
}
