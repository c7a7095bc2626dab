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

//! Containers must drop ALL capabilities, and are only permitted to add back
//! the NET_BIND_SERVICE capability.
//!
//! Restricted fields:
//! - `spec.containers[*].securityContext.capabilities.drop`
//! - `spec.initContainers[*].securityContext.capabilities.drop`
//!
//! Allowed values: must include "ALL".
//!
//! Restricted fields:
//! - `spec.containers[*].securityContext.capabilities.add`
//! - `spec.initContainers[*].securityContext.capabilities.add`
//!
//! Allowed values: undefined, empty, "NET_BIND_SERVICE".

use std::collections::BTreeSet;

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::violations::{forbidden, merge_errs, required, Violations};
use crate::policy::visitor::visit_containers;

const CAPABILITY_ALL: &str = "ALL";
const CAPABILITIES_ALLOWED_1_22: [&str; 1] = ["NET_BIND_SERVICE"];

pub fn check_capabilities_restricted() -> Check {
    Check {
        id: "capabilities",
        level: Level::Restricted,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 22),
            check_pod: capabilities_restricted_v1_22,
        }],
    }
}

fn capabilities_restricted_v1_22(
    _pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    let mut containers_missing_drop_all = Violations::new(opts.with_field_errors);
    let mut containers_adding_forbidden = Violations::new(opts.with_field_errors);
    let mut forbidden_capabilities = BTreeSet::new();

    visit_containers(pod_spec, opts, |container, path| {
        let path = path.child_path(&["securityContext", "capabilities"]);
        let Some(capabilities) = container
            .security_context
            .as_ref()
            .and_then(|sc| sc.capabilities.as_ref())
        else {
            containers_missing_drop_all
                .add_with_errors(container.name.as_str(), Some(required(path.child("drop"))));
            return;
        };

        if !capabilities.drop.iter().any(|c| c == CAPABILITY_ALL) {
            containers_missing_drop_all.add_with_errors(
                container.name.as_str(),
                Some(
                    forbidden(path.child("drop"))
                        .with_bad_value_fn(|| capabilities.drop.clone()),
                ),
            );
        }

        let mut err_fns = Vec::new();
        for (i, capability) in capabilities.add.iter().enumerate() {
            if CAPABILITIES_ALLOWED_1_22.contains(&capability.as_str()) {
                continue;
            }
            forbidden_capabilities.insert(capability.clone());
            err_fns.push(forbidden(path.child("add").index(i)).with_bad_value(capability.as_str()));
        }
        if !err_fns.is_empty() {
            containers_adding_forbidden.add_with_errors(container.name.as_str(), err_fns);
        }
    });

    let mut forbidden_details = Vec::new();
    if !containers_missing_drop_all.is_empty() {
        forbidden_details.push(format!(
            r#"{} {} must set securityContext.capabilities.drop=["ALL"]"#,
            pluralize("container", "containers", containers_missing_drop_all.len()),
            join_quote(containers_missing_drop_all.data()),
        ));
    }
    if !containers_adding_forbidden.is_empty() {
        let forbidden_capabilities: Vec<String> = forbidden_capabilities.into_iter().collect();
        forbidden_details.push(format!(
            "{} {} must not include {} in securityContext.capabilities.add",
            pluralize("container", "containers", containers_adding_forbidden.len()),
            join_quote(containers_adding_forbidden.data()),
            join_quote(&forbidden_capabilities),
        ));
    }

    if forbidden_details.is_empty() {
        return CheckResult::allowed();
    }
    let err_list = merge_errs(
        containers_missing_drop_all.into_errs(),
        containers_adding_forbidden.into_errs(),
    );
    CheckResult::forbidden("unrestricted capabilities", forbidden_details.join("; "), err_list)
}
