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

//! Check definitions and the per-check result type.

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::field::ErrorList;
use serde::Serialize;
use std::fmt;

/// Options are per-evaluation settings passed to every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Populate `CheckResult::err_list` with exact field paths and bad values.
    pub with_field_errors: bool,
}

/// CheckPodFn evaluates a pod against one version of a check.
pub type CheckPodFn = fn(&ObjectMeta, &PodSpec, &Options) -> CheckResult;

/// CheckFactory produces a check for registration.
pub type CheckFactory = fn() -> Check;

/// VersionedCheck is the implementation of a check that applies from
/// `minimum_version` until the next entry's minimum version.
#[derive(Clone, Copy)]
pub struct VersionedCheck {
    pub minimum_version: Version,
    pub check_pod: CheckPodFn,
}

impl fmt::Debug for VersionedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedCheck")
            .field("minimum_version", &self.minimum_version)
            .finish_non_exhaustive()
    }
}

/// Check is a named rule enforced at `level` and above.
#[derive(Debug, Clone)]
pub struct Check {
    /// Short stable identifier, e.g. "hostPorts".
    pub id: &'static str,
    /// The least strict level this check is part of.
    pub level: Level,
    /// Implementations ordered by strictly increasing minimum version.
    pub versions: Vec<VersionedCheck>,
}

impl Check {
    /// Select the implementation for `version`: the last entry whose minimum
    /// version does not exceed it. `None` means the check did not exist yet at
    /// that version.
    pub fn resolve(&self, version: Version) -> Option<&VersionedCheck> {
        self.versions
            .iter()
            .rev()
            .find(|v| v.minimum_version <= version)
    }
}

/// CheckResult is the outcome of one check against one pod.
///
/// An allowed result has an empty reason, an empty detail and no error list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub allowed: bool,
    /// Short, stable category, e.g. "privileged".
    pub forbidden_reason: String,
    /// Fully rendered explanation.
    pub forbidden_detail: String,
    /// Only present when field errors were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_list: Option<ErrorList>,
}

impl CheckResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            forbidden_reason: String::new(),
            forbidden_detail: String::new(),
            err_list: None,
        }
    }

    pub fn forbidden(
        reason: impl Into<String>,
        detail: impl Into<String>,
        err_list: Option<ErrorList>,
    ) -> Self {
        Self {
            allowed: false,
            forbidden_reason: reason.into(),
            forbidden_detail: detail.into(),
            err_list,
        }
    }
}

/// Pick the singular or plural form for `count`.
pub fn pluralize<'a>(singular: &'a str, plural: &'a str, count: usize) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Double-quote `s`, escaping quotes, backslashes and control characters the
/// way Go's `%q` verb does.
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str(r#"\""#),
            '\\' => quoted.push_str(r"\\"),
            '\u{7}' => quoted.push_str(r"\a"),
            '\u{8}' => quoted.push_str(r"\b"),
            '\u{c}' => quoted.push_str(r"\f"),
            '\n' => quoted.push_str(r"\n"),
            '\r' => quoted.push_str(r"\r"),
            '\t' => quoted.push_str(r"\t"),
            '\u{b}' => quoted.push_str(r"\v"),
            c if c.is_ascii_control() => quoted.push_str(&format!(r"\x{:02x}", c as u32)),
            c if c.is_control() => quoted.push_str(&format!(r"\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Quote and comma-join: `"a", "b"`. Items are not escaped.
pub fn join_quote<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(r#"", ""#);
    format!("\"{joined}\"")
}
