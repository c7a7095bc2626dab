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

//! Privilege escalation (such as via set-user-ID or set-group-ID file mode)
//! should not be allowed.
//!
//! Restricted fields:
//! `spec.containers[*].securityContext.allowPrivilegeEscalation`,
//! `spec.initContainers[*].securityContext.allowPrivilegeEscalation`.
//!
//! Allowed values: false.

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::violations::{forbidden, required, Violations};
use crate::policy::visitor::visit_containers;

pub fn check_allow_privilege_escalation() -> Check {
    Check {
        id: "allowPrivilegeEscalation",
        level: Level::Restricted,
        versions: vec![VersionedCheck {
            // Field added in 1.8.
            minimum_version: Version::major_minor(1, 8),
            check_pod: allow_privilege_escalation_v1_8,
        }],
    }
}

fn allow_privilege_escalation_v1_8(
    _pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    let mut bad_containers = Violations::new(opts.with_field_errors);

    visit_containers(pod_spec, opts, |container, path| {
        let path = path.child_path(&["securityContext", "allowPrivilegeEscalation"]);
        match container
            .security_context
            .as_ref()
            .and_then(|sc| sc.allow_privilege_escalation)
        {
            Some(false) => {}
            None => bad_containers.add_with_errors(container.name.as_str(), Some(required(path))),
            Some(true) => bad_containers.add_with_errors(
                container.name.as_str(),
                Some(forbidden(path).with_bad_value(true)),
            ),
        }
    });

    if bad_containers.is_empty() {
        return CheckResult::allowed();
    }
    let detail = format!(
        "{} {} must set securityContext.allowPrivilegeEscalation=false",
        pluralize("container", "containers", bad_containers.len()),
        join_quote(bad_containers.data()),
    );
    CheckResult::forbidden(
        "allowPrivilegeEscalation != false",
        detail,
        bad_containers.into_errs(),
    )
}
