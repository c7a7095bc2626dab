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

//! Policy configuration.

use serde::{Deserialize, Serialize};

use crate::api::LevelVersion;
use crate::policy::{relax_policy_for_user_namespace_pods, Options};

/// PolicyConfig is the embedder-facing configuration of the policy engine.
///
/// ```json
/// {
///   "enforce": "baseline:v1.25",
///   "relaxPolicyForUserNamespacePods": true,
///   "withFieldErrors": false
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyConfig {
    /// Level and version enforced when the namespace does not say otherwise.
    pub enforce: LevelVersion,
    /// Let pods with `hostUsers: false` through the checks that honor it.
    pub relax_policy_for_user_namespace_pods: bool,
    /// Attach structured field errors to denials.
    pub with_field_errors: bool,
}

impl PolicyConfig {
    /// Set the process-wide toggles from this configuration.
    pub fn apply(&self) {
        relax_policy_for_user_namespace_pods(self.relax_policy_for_user_namespace_pods);
    }

    pub fn options(&self) -> Options {
        Options {
            with_field_errors: self.with_field_errors,
        }
    }
}
