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

//! On supported hosts the `runtime/default` AppArmor profile is applied by
//! default. Overriding or disabling it is restricted to an allowed set of
//! profiles.
//!
//! Restricted fields:
//! `metadata.annotations['container.apparmor.security.beta.kubernetes.io/*']`.
//!
//! Allowed values: `runtime/default`, `localhost/*`, empty, undefined.

use crate::api::core::{
    ObjectMeta, PodSpec, APPARMOR_BETA_CONTAINER_ANNOTATION_KEY_PREFIX,
    APPARMOR_BETA_PROFILE_NAME_PREFIX, APPARMOR_BETA_PROFILE_RUNTIME_DEFAULT,
};
use crate::api::{Level, Version};
use crate::policy::check::{pluralize, quote, Check, CheckResult, Options, VersionedCheck};
use crate::policy::paths::{annotations_path, requested_path};
use crate::policy::violations::{forbidden, Violations};

pub fn check_app_armor_profile() -> Check {
    Check {
        id: "appArmorProfile",
        level: Level::Baseline,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: app_armor_profile_v1_0,
        }],
    }
}

fn allowed_profile(profile: &str) -> bool {
    profile.is_empty()
        || profile == APPARMOR_BETA_PROFILE_RUNTIME_DEFAULT
        || profile.starts_with(APPARMOR_BETA_PROFILE_NAME_PREFIX)
}

fn app_armor_profile_v1_0(
    pod_metadata: &ObjectMeta,
    _pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    let mut forbidden_profiles = Violations::new(opts.with_field_errors);
    let annotations = requested_path(opts, annotations_path);

    for (key, value) in &pod_metadata.annotations {
        if key.starts_with(APPARMOR_BETA_CONTAINER_ANNOTATION_KEY_PREFIX) && !allowed_profile(value) {
            forbidden_profiles.add_with_errors(
                format!("{key}={}", quote(value)),
                Some(forbidden(annotations.key(key)).with_bad_value(value.as_str())),
            );
        }
    }

    if forbidden_profiles.is_empty() {
        return CheckResult::allowed();
    }
    let mut forbidden_values = forbidden_profiles.data().to_vec();
    forbidden_values.sort();
    CheckResult::forbidden(
        pluralize(
            "forbidden AppArmor profile",
            "forbidden AppArmor profiles",
            forbidden_values.len(),
        ),
        forbidden_values.join(", "),
        forbidden_profiles.into_errs(),
    )
}
