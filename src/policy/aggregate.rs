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

//! Folding per-check results into one verdict.

use super::check::CheckResult;
use crate::field::ErrorList;
use serde::Serialize;

/// Verdict is the combined outcome of all checks evaluated for one pod.
///
/// Reasons, details and field errors keep the order of the results they came
/// from, which is check registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub allowed: bool,
    /// Reasons of failing checks, first occurrence only.
    pub forbidden_reasons: Vec<String>,
    /// One detail per failing check.
    pub forbidden_details: Vec<String>,
    /// Field errors of all failing checks that carried them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_list: Option<ErrorList>,
}

impl Verdict {
    /// Reasons joined with ", ".
    pub fn forbidden_reason(&self) -> String {
        self.forbidden_reasons.join(", ")
    }

    /// Details joined with "; ".
    pub fn forbidden_detail(&self) -> String {
        self.forbidden_details.join("; ")
    }
}

/// Combine check results. The verdict is allowed only if every result is.
pub fn aggregate_check_results(results: impl IntoIterator<Item = CheckResult>) -> Verdict {
    let mut verdict = Verdict {
        allowed: true,
        forbidden_reasons: Vec::new(),
        forbidden_details: Vec::new(),
        err_list: None,
    };

    for result in results {
        if result.allowed {
            continue;
        }
        verdict.allowed = false;
        if !verdict.forbidden_reasons.contains(&result.forbidden_reason) {
            verdict.forbidden_reasons.push(result.forbidden_reason);
        }
        verdict.forbidden_details.push(result.forbidden_detail);
        if let Some(errs) = result.err_list {
            verdict.err_list.get_or_insert_with(ErrorList::new).extend(errs);
        }
    }
    verdict
}
