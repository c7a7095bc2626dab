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

use super::check::{Check, CheckResult, Options};
use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, Version};

/// Evaluate a pod against every check whose level is at or below `level`.
///
/// Results come back in the order of `checks`. A check with no implementation
/// for `version` still contributes an allowed result.
pub fn evaluate(
    checks: &[Check],
    level: Level,
    version: Version,
    pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> Vec<CheckResult> {
    checks
        .iter()
        .filter(|check| check.level <= level)
        .map(|check| {
            let Some(versioned) = check.resolve(version) else {
                tracing::trace!(check = check.id, %version, "check does not apply at version");
                return CheckResult::allowed();
            };
            let result = (versioned.check_pod)(pod_metadata, pod_spec, opts);
            debug_assert!(
                opts.with_field_errors || result.err_list.is_none(),
                "check {} returned field errors that were not requested",
                check.id
            );
            tracing::trace!(check = check.id, allowed = result.allowed, "evaluated check");
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::check::VersionedCheck;

    fn allow(_: &ObjectMeta, _: &PodSpec, _: &Options) -> CheckResult {
        CheckResult::allowed()
    }

    fn deny_v1(_: &ObjectMeta, _: &PodSpec, _: &Options) -> CheckResult {
        CheckResult::forbidden("v1", "v1 detail", None)
    }

    fn deny_v2(_: &ObjectMeta, _: &PodSpec, _: &Options) -> CheckResult {
        CheckResult::forbidden("v2", "v2 detail", None)
    }

    fn deny_v3(_: &ObjectMeta, _: &PodSpec, _: &Options) -> CheckResult {
        CheckResult::forbidden("v3", "v3 detail", None)
    }

    fn three_versions() -> Check {
        Check {
            id: "evolving",
            level: Level::Baseline,
            versions: vec![
                VersionedCheck {
                    minimum_version: Version::major_minor(1, 2),
                    check_pod: deny_v1,
                },
                VersionedCheck {
                    minimum_version: Version::major_minor(1, 5),
                    check_pod: deny_v2,
                },
                VersionedCheck {
                    minimum_version: Version::major_minor(1, 9),
                    check_pod: deny_v3,
                },
            ],
        }
    }

    fn run(checks: &[Check], level: Level, version: Version) -> Vec<CheckResult> {
        evaluate(
            checks,
            level,
            version,
            &ObjectMeta::default(),
            &PodSpec::default(),
            &Options::default(),
        )
    }

    #[test]
    fn test_version_monotonicity() {
        let checks = [three_versions()];
        for minor in 5..9 {
            let results = run(&checks, Level::Baseline, Version::major_minor(1, minor));
            assert_eq!(results[0].forbidden_reason, "v2", "at v1.{minor}");
        }
        assert_eq!(run(&checks, Level::Baseline, Version::major_minor(1, 9))[0].forbidden_reason, "v3");
        assert_eq!(run(&checks, Level::Baseline, Version::latest())[0].forbidden_reason, "v3");
        assert_eq!(run(&checks, Level::Baseline, Version::major_minor(1, 4))[0].forbidden_reason, "v1");
    }

    #[test]
    fn test_inapplicable_version_passes_and_is_kept() {
        let checks = [three_versions()];
        let results = run(&checks, Level::Baseline, Version::major_minor(1, 1));
        assert_eq!(results, vec![CheckResult::allowed()]);
    }

    #[test]
    fn test_filters_checks_above_requested_level() {
        let checks = [
            Check {
                id: "baseline",
                level: Level::Baseline,
                versions: vec![VersionedCheck {
                    minimum_version: Version::major_minor(1, 0),
                    check_pod: deny_v1,
                }],
            },
            Check {
                id: "restricted",
                level: Level::Restricted,
                versions: vec![VersionedCheck {
                    minimum_version: Version::major_minor(1, 0),
                    check_pod: allow,
                }],
            },
        ];

        assert!(run(&checks, Level::Privileged, Version::latest()).is_empty());
        assert_eq!(run(&checks, Level::Baseline, Version::latest()).len(), 1);

        let restricted = run(&checks, Level::Restricted, Version::latest());
        assert_eq!(restricted.len(), 2);
        assert!(!restricted[0].allowed);
        assert!(restricted[1].allowed);
    }
}
