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

//! The default /proc masks are set up to reduce attack surface, and should be
//! required.
//!
//! Restricted fields: `spec.containers[*].securityContext.procMount`,
//! `spec.initContainers[*].securityContext.procMount`.
//!
//! Allowed values: undefined, "Default".
//!
//! Pods running in their own user namespace pass when the cluster has the
//! user namespace relaxation enabled.

use std::collections::BTreeSet;

use crate::api::core::{ObjectMeta, PodSpec, ProcMountType};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::relax::relax_policy_for_user_namespace_pod;
use crate::policy::violations::{forbidden, Violations};
use crate::policy::visitor::visit_containers;

pub fn check_proc_mount() -> Check {
    Check {
        id: "procMount",
        level: Level::Baseline,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: proc_mount_v1_0,
        }],
    }
}

fn proc_mount_v1_0(_pod_metadata: &ObjectMeta, pod_spec: &PodSpec, opts: &Options) -> CheckResult {
    if relax_policy_for_user_namespace_pod(pod_spec) {
        return CheckResult::allowed();
    }

    let mut bad_containers = Violations::new(opts.with_field_errors);
    let mut forbidden_proc_mount_types = BTreeSet::new();

    visit_containers(pod_spec, opts, |container, path| {
        let Some(proc_mount) = container
            .security_context
            .as_ref()
            .and_then(|sc| sc.proc_mount.as_ref())
        else {
            return;
        };
        // Compare the value, since Other can carry any string.
        if proc_mount.as_str() == ProcMountType::Default.as_str() {
            return;
        }
        bad_containers.add_with_errors(
            container.name.as_str(),
            Some(
                forbidden(path.child_path(&["securityContext", "procMount"]))
                    .with_bad_value(proc_mount.as_str()),
            ),
        );
        forbidden_proc_mount_types.insert(proc_mount.as_str().to_string());
    });

    if bad_containers.is_empty() {
        return CheckResult::allowed();
    }
    let forbidden_proc_mount_types: Vec<String> = forbidden_proc_mount_types.into_iter().collect();
    let detail = format!(
        "{} {} must not set securityContext.procMount to {}",
        pluralize("container", "containers", bad_containers.len()),
        join_quote(bad_containers.data()),
        join_quote(&forbidden_proc_mount_types),
    );
    CheckResult::forbidden("procMount", detail, bad_containers.into_errs())
}
