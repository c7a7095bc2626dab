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

//! Setting the SELinux type is restricted, and setting a custom SELinux user or
//! role option is forbidden.
//!
//! Restricted fields:
//! - `spec.securityContext.seLinuxOptions.type`
//! - `spec.containers[*].securityContext.seLinuxOptions.type`
//! - `spec.initContainers[*].securityContext.seLinuxOptions.type`
//!
//! Allowed values: undefined, empty, `container_t`, `container_init_t`,
//! `container_kvm_t`.
//!
//! Restricted fields:
//! - `spec.securityContext.seLinuxOptions.user`
//! - `spec.containers[*].securityContext.seLinuxOptions.user`
//! - `spec.initContainers[*].securityContext.seLinuxOptions.user`
//! - `spec.securityContext.seLinuxOptions.role`
//! - `spec.containers[*].securityContext.seLinuxOptions.role`
//! - `spec.initContainers[*].securityContext.seLinuxOptions.role`
//!
//! Allowed values: undefined, empty.

use std::collections::BTreeSet;

use crate::api::core::{ObjectMeta, PodSpec, SELinuxOptions};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::paths::{
    requested_path, se_linux_options_role_path, se_linux_options_type_path,
    se_linux_options_user_path, PathFn,
};
use crate::policy::violations::{forbidden, ErrFn, Violations};
use crate::policy::visitor::visit_containers;

const SELINUX_ALLOWED_TYPES_1_0: [&str; 4] =
    ["", "container_t", "container_init_t", "container_kvm_t"];

pub fn check_selinux_options() -> Check {
    Check {
        id: "seLinuxOptions",
        level: Level::Baseline,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: selinux_options_v1_0,
        }],
    }
}

/// What was found wrong across the pod and all of its containers.
#[derive(Default)]
struct Findings {
    bad_types: BTreeSet<String>,
    set_user: bool,
    set_role: bool,
}

impl Findings {
    /// Inspect one set of options. `paths` are the type, user and role fields.
    /// Returns one error constructor per offending field, so an empty result
    /// means the options are valid.
    fn inspect(&mut self, options: &SELinuxOptions, paths: [PathFn; 3]) -> Vec<ErrFn> {
        let [type_path, user_path, role_path] = paths;
        let mut err_fns = Vec::new();
        if !SELINUX_ALLOWED_TYPES_1_0.contains(&options.type_.as_str()) {
            self.bad_types.insert(options.type_.clone());
            err_fns.push(forbidden(type_path).with_bad_value(options.type_.as_str()));
        }
        if !options.user.is_empty() {
            self.set_user = true;
            err_fns.push(forbidden(user_path).with_bad_value(options.user.as_str()));
        }
        if !options.role.is_empty() {
            self.set_role = true;
            err_fns.push(forbidden(role_path).with_bad_value(options.role.as_str()));
        }
        err_fns
    }
}

fn selinux_options_v1_0(
    _pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    let mut bad_setters = Violations::new(opts.with_field_errors);
    let mut findings = Findings::default();

    if let Some(options) = pod_spec
        .security_context
        .as_ref()
        .and_then(|sc| sc.se_linux_options.as_ref())
    {
        let err_fns = findings.inspect(
            options,
            [
                requested_path(opts, se_linux_options_type_path),
                requested_path(opts, se_linux_options_user_path),
                requested_path(opts, se_linux_options_role_path),
            ],
        );
        if !err_fns.is_empty() {
            bad_setters.add_with_errors("pod", err_fns);
        }
    }

    let mut bad_containers = Vec::new();
    let mut container_err_fns = Vec::new();
    visit_containers(pod_spec, opts, |container, path| {
        let Some(options) = container
            .security_context
            .as_ref()
            .and_then(|sc| sc.se_linux_options.as_ref())
        else {
            return;
        };
        let base = path.child_path(&["securityContext", "seLinuxOptions"]);
        let err_fns = findings.inspect(
            options,
            [base.child("type"), base.child("user"), base.child("role")],
        );
        if !err_fns.is_empty() {
            bad_containers.push(container.name.clone());
            container_err_fns.extend(err_fns);
        }
    });

    if !bad_containers.is_empty() {
        bad_setters.add_with_errors(
            format!(
                "{} {}",
                pluralize("container", "containers", bad_containers.len()),
                join_quote(&bad_containers),
            ),
            container_err_fns,
        );
    }

    if bad_setters.is_empty() {
        return CheckResult::allowed();
    }

    let mut bad_data = Vec::new();
    if !findings.bad_types.is_empty() {
        let bad_types: Vec<String> = findings.bad_types.into_iter().collect();
        bad_data.push(format!(
            "{} {}",
            pluralize("type", "types", bad_types.len()),
            join_quote(&bad_types),
        ));
    }
    if findings.set_user {
        bad_data.push("user may not be set".to_string());
    }
    if findings.set_role {
        bad_data.push("role may not be set".to_string());
    }

    let detail = format!(
        "{} set forbidden securityContext.seLinuxOptions: {}",
        bad_setters.data().join(" and "),
        bad_data.join("; "),
    );
    CheckResult::forbidden("seLinuxOptions", detail, bad_setters.into_errs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::core::{Container, PodSecurityContext, SecurityContext};
    use serde_json::json;

    fn selinux(type_: &str, user: &str, role: &str) -> SELinuxOptions {
        SELinuxOptions {
            type_: type_.to_string(),
            user: user.to_string(),
            role: role.to_string(),
            ..Default::default()
        }
    }

    fn with_selinux(name: &str, options: SELinuxOptions) -> Container {
        Container::with_security_context(
            name,
            SecurityContext {
                se_linux_options: Some(options),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_selinux_options_allowed_types() {
        let spec = PodSpec {
            security_context: Some(PodSecurityContext {
                se_linux_options: Some(selinux("container_t", "", "")),
                ..Default::default()
            }),
            containers: vec![
                with_selinux("a", selinux("", "", "")),
                with_selinux("b", selinux("container_init_t", "", "")),
                with_selinux("c", selinux("container_kvm_t", "", "")),
            ],
            ..Default::default()
        };
        assert!(selinux_options_v1_0(&ObjectMeta::default(), &spec, &Options::default()).allowed);
    }

    #[test]
    fn test_selinux_options_pod_and_containers() {
        let spec = PodSpec {
            security_context: Some(PodSecurityContext {
                se_linux_options: Some(selinux("bar", "", "")),
                ..Default::default()
            }),
            containers: vec![
                with_selinux("a", selinux("foo", "", "")),
                with_selinux("b", selinux("container_t", "sys", "")),
                with_selinux("c", selinux("container_t", "", "")),
                with_selinux("d", selinux("", "", "admin")),
            ],
            ..Default::default()
        };
        let result = selinux_options_v1_0(&ObjectMeta::default(), &spec, &Options::default());
        assert!(!result.allowed);
        assert_eq!(result.forbidden_reason, "seLinuxOptions");
        assert_eq!(
            result.forbidden_detail,
            r#"pod and containers "a", "b", "d" set forbidden securityContext.seLinuxOptions: types "bar", "foo"; user may not be set; role may not be set"#
        );
    }

    #[test]
    fn test_selinux_options_single_container() {
        let spec = PodSpec {
            containers: vec![with_selinux("a", selinux("foo", "", ""))],
            ..Default::default()
        };
        let result = selinux_options_v1_0(&ObjectMeta::default(), &spec, &Options::default());
        assert_eq!(
            result.forbidden_detail,
            r#"container "a" set forbidden securityContext.seLinuxOptions: type "foo""#
        );
    }

    #[test]
    fn test_selinux_options_field_errors() {
        let spec = PodSpec {
            security_context: Some(PodSecurityContext {
                se_linux_options: Some(selinux("", "sys", "")),
                ..Default::default()
            }),
            init_containers: vec![with_selinux("init", selinux("foo", "", "admin"))],
            ..Default::default()
        };
        let result = selinux_options_v1_0(
            &ObjectMeta::default(),
            &spec,
            &Options {
                with_field_errors: true,
            },
        );
        let errs = result.err_list.unwrap();
        let fields: Vec<_> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "spec.securityContext.seLinuxOptions.user",
                "spec.initContainers[0].securityContext.seLinuxOptions.type",
                "spec.initContainers[0].securityContext.seLinuxOptions.role",
            ]
        );
        assert_eq!(errs[0].bad_value, json!("sys"));
        assert_eq!(errs[1].bad_value, json!("foo"));
        assert_eq!(errs[2].bad_value, json!("admin"));
    }
}
