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

//! Sharing the host namespaces must be disallowed.
//!
//! Restricted fields: `spec.hostNetwork`, `spec.hostPID`, `spec.hostIPC`.
//!
//! Allowed values: false, undefined.

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::policy::check::{Check, CheckResult, Options, VersionedCheck};
use crate::policy::paths::{host_ipc_path, host_network_path, host_pid_path, requested_path};
use crate::policy::violations::{forbidden, Violations};

pub fn check_host_namespaces() -> Check {
    Check {
        id: "hostNamespaces",
        level: Level::Baseline,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: host_namespaces_v1_0,
        }],
    }
}

fn host_namespaces_v1_0(
    _pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    let mut host_namespaces = Violations::new(opts.with_field_errors);

    if pod_spec.host_network {
        host_namespaces.add_with_errors(
            "hostNetwork=true",
            Some(forbidden(requested_path(opts, host_network_path)).with_bad_value(true)),
        );
    }
    if pod_spec.host_pid {
        host_namespaces.add_with_errors(
            "hostPID=true",
            Some(forbidden(requested_path(opts, host_pid_path)).with_bad_value(true)),
        );
    }
    if pod_spec.host_ipc {
        host_namespaces.add_with_errors(
            "hostIPC=true",
            Some(forbidden(requested_path(opts, host_ipc_path)).with_bad_value(true)),
        );
    }

    if host_namespaces.is_empty() {
        return CheckResult::allowed();
    }
    let detail = host_namespaces.data().join(", ");
    CheckResult::forbidden("host namespaces", detail, host_namespaces.into_errs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_host_namespaces_allowed() {
        let result = host_namespaces_v1_0(
            &ObjectMeta::default(),
            &PodSpec::default(),
            &Options::default(),
        );
        assert_eq!(result, CheckResult::allowed());
    }

    #[test]
    fn test_host_namespaces_all_set() {
        let spec = PodSpec {
            host_network: true,
            host_pid: true,
            host_ipc: true,
            ..Default::default()
        };
        let result = host_namespaces_v1_0(&ObjectMeta::default(), &spec, &Options::default());
        assert!(!result.allowed);
        assert_eq!(result.forbidden_reason, "host namespaces");
        assert_eq!(
            result.forbidden_detail,
            "hostNetwork=true, hostPID=true, hostIPC=true"
        );
        assert!(result.err_list.is_none());
    }

    #[test]
    fn test_host_namespaces_field_errors() {
        let spec = PodSpec {
            host_pid: true,
            ..Default::default()
        };
        let result = host_namespaces_v1_0(
            &ObjectMeta::default(),
            &spec,
            &Options {
                with_field_errors: true,
            },
        );
        assert_eq!(result.forbidden_detail, "hostPID=true");
        let errs = result.err_list.unwrap();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "spec.hostPID");
        assert_eq!(errs[0].bad_value, Value::Bool(true));
    }
}
