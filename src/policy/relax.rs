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

//! Cluster-wide relaxation for pods that run in their own user namespace.
//!
//! This mirrors a feature gate: it is set once while the process is configured
//! and read by the checks that honor it. It is not a per-request option.

use crate::api::core::PodSpec;
use std::sync::atomic::{AtomicBool, Ordering};

static RELAX_POLICY_FOR_USER_NAMESPACE_PODS: AtomicBool = AtomicBool::new(false);

/// Enable or disable the relaxation for pods with `hostUsers: false`.
pub fn relax_policy_for_user_namespace_pods(relax: bool) {
    let previous = RELAX_POLICY_FOR_USER_NAMESPACE_PODS.swap(relax, Ordering::SeqCst);
    if previous != relax {
        tracing::info!(relax, "pod security relaxation for user namespace pods changed");
    }
}

/// Reports whether the relaxation is currently enabled.
pub fn relaxing_policy_for_user_namespace_pods() -> bool {
    RELAX_POLICY_FOR_USER_NAMESPACE_PODS.load(Ordering::SeqCst)
}

/// Whether checks that honor the relaxation should let this pod through.
pub(crate) fn relax_policy_for_user_namespace_pod(pod_spec: &PodSpec) -> bool {
    relaxing_policy_for_user_namespace_pods() && pod_spec.host_users == Some(false)
}
