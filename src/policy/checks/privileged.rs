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

//! Privileged pods disable most security mechanisms and must be disallowed.
//!
//! Restricted fields: `spec.containers[*].securityContext.privileged`,
//! `spec.initContainers[*].securityContext.privileged`.
//!
//! Allowed values: false, undefined.

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::violations::{forbidden, Violations};
use crate::policy::visitor::visit_containers;

pub fn check_privileged() -> Check {
    Check {
        id: "privileged",
        level: Level::Baseline,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: privileged_v1_0,
        }],
    }
}

fn privileged_v1_0(_pod_metadata: &ObjectMeta, pod_spec: &PodSpec, opts: &Options) -> CheckResult {
    let mut bad_containers = Violations::new(opts.with_field_errors);

    visit_containers(pod_spec, opts, |container, path| {
        let privileged = container
            .security_context
            .as_ref()
            .and_then(|sc| sc.privileged)
            .unwrap_or(false);
        if privileged {
            bad_containers.add_with_errors(
                container.name.as_str(),
                Some(forbidden(path.child_path(&["securityContext", "privileged"])).with_bad_value(true)),
            );
        }
    });

    if bad_containers.is_empty() {
        return CheckResult::allowed();
    }
    let detail = format!(
        "{} {} must not set securityContext.privileged=true",
        pluralize("container", "containers", bad_containers.len()),
        join_quote(bad_containers.data()),
    );
    CheckResult::forbidden("privileged", detail, bad_containers.into_errs())
}
