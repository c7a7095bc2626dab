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

//! HostPorts should be disallowed, or at minimum restricted to a known list.
//!
//! Restricted fields: `spec.containers[*].ports[*].hostPort`,
//! `spec.initContainers[*].ports[*].hostPort`.
//!
//! Allowed values: 0, undefined.

use std::collections::BTreeSet;

use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::violations::{forbidden, Violations};
use crate::policy::visitor::visit_containers;

pub fn check_host_ports() -> Check {
    Check {
        id: "hostPorts",
        level: Level::Baseline,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: host_ports_v1_0,
        }],
    }
}

fn host_ports_v1_0(_pod_metadata: &ObjectMeta, pod_spec: &PodSpec, opts: &Options) -> CheckResult {
    let mut bad_containers = Violations::new(opts.with_field_errors);
    // Ordered as strings, so 443 sorts before 80.
    let mut forbidden_host_ports = BTreeSet::new();

    visit_containers(pod_spec, opts, |container, path| {
        let mut valid = true;
        let mut err_fns = Vec::new();
        for (i, port) in container.ports.iter().enumerate() {
            if port.host_port == 0 {
                continue;
            }
            valid = false;
            forbidden_host_ports.insert(port.host_port.to_string());
            if opts.with_field_errors {
                err_fns.push(
                    forbidden(path.child("ports").index(i).child("hostPort"))
                        .with_bad_value(port.host_port),
                );
            }
        }
        if !valid {
            bad_containers.add_with_errors(container.name.as_str(), err_fns);
        }
    });

    if bad_containers.is_empty() {
        return CheckResult::allowed();
    }
    let detail = format!(
        "{} {} {} {} {}",
        pluralize("container", "containers", bad_containers.len()),
        join_quote(bad_containers.data()),
        pluralize("uses", "use", bad_containers.len()),
        pluralize("hostPort", "hostPorts", forbidden_host_ports.len()),
        forbidden_host_ports.into_iter().collect::<Vec<_>>().join(", "),
    );
    CheckResult::forbidden("hostPort", detail, bad_containers.into_errs())
}
