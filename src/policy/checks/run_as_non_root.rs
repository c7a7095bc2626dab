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

//! Containers must be required to run as non-root users.
//!
//! Restricted fields: `spec.securityContext.runAsNonRoot`,
//! `spec.containers[*].securityContext.runAsNonRoot`,
//! `spec.initContainers[*].securityContext.runAsNonRoot`.
//!
//! Allowed values: true. Containers may leave it undefined when the pod sets
//! it to true.
//!
//! Pods running in their own user namespace pass when the cluster has the
//! user namespace relaxation enabled.

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::paths::{requested_path, run_as_non_root_path};
use crate::policy::relax::relax_policy_for_user_namespace_pod;
use crate::policy::violations::{forbidden, merge_errs, required, Violations};
use crate::policy::visitor::visit_containers;

pub fn check_run_as_non_root() -> Check {
    Check {
        id: "runAsNonRoot",
        level: Level::Restricted,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: run_as_non_root_v1_0,
        }],
    }
}

fn run_as_non_root_v1_0(
    _pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    if relax_policy_for_user_namespace_pod(pod_spec) {
        return CheckResult::allowed();
    }

    // The pod or containers that explicitly set runAsNonRoot=false.
    let mut bad_setters = Violations::new(opts.with_field_errors);
    // Containers that left it unset without a pod-level runAsNonRoot=true.
    let mut implicitly_bad_containers = Violations::new(opts.with_field_errors);

    let mut pod_run_as_non_root = false;
    match pod_spec
        .security_context
        .as_ref()
        .and_then(|sc| sc.run_as_non_root)
    {
        Some(false) => bad_setters.add_with_errors(
            "pod",
            Some(forbidden(requested_path(opts, run_as_non_root_path)).with_bad_value(false)),
        ),
        Some(true) => pod_run_as_non_root = true,
        None => {}
    }

    let mut explicitly_bad_containers = Vec::new();
    let mut explicit_err_fns = Vec::new();
    visit_containers(pod_spec, opts, |container, path| {
        let path = path.child_path(&["securityContext", "runAsNonRoot"]);
        match container
            .security_context
            .as_ref()
            .and_then(|sc| sc.run_as_non_root)
        {
            Some(true) => {}
            Some(false) => {
                explicitly_bad_containers.push(container.name.clone());
                explicit_err_fns.push(forbidden(path).with_bad_value(false));
            }
            None if pod_run_as_non_root => {}
            None => implicitly_bad_containers
                .add_with_errors(container.name.as_str(), Some(required(path))),
        }
    });

    if !explicitly_bad_containers.is_empty() {
        bad_setters.add_with_errors(
            format!(
                "{} {}",
                pluralize("container", "containers", explicitly_bad_containers.len()),
                join_quote(&explicitly_bad_containers),
            ),
            explicit_err_fns,
        );
    }

    let mut forbidden_details = Vec::new();
    if !bad_setters.is_empty() {
        forbidden_details.push(format!(
            "{} must not set securityContext.runAsNonRoot=false",
            bad_setters.data().join(" and "),
        ));
    }
    if !implicitly_bad_containers.is_empty() {
        forbidden_details.push(format!(
            "pod or {} {} must set securityContext.runAsNonRoot=true",
            pluralize("container", "containers", implicitly_bad_containers.len()),
            join_quote(implicitly_bad_containers.data()),
        ));
    }

    if forbidden_details.is_empty() {
        return CheckResult::allowed();
    }
    let err_list = merge_errs(bad_setters.into_errs(), implicitly_bad_containers.into_errs());
    CheckResult::forbidden("runAsNonRoot != true", forbidden_details.join("; "), err_list)
}
