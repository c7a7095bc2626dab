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

//! Check registry.
//!
//! The registry is built once at startup through [`CheckRegistry::add_check`]
//! and is read-only afterwards. Checks are kept in registration order, which is
//! the order of every evaluation result and of the aggregated verdict.

use super::check::{Check, CheckFactory, CheckResult, Options, VersionedCheck};
use super::checks;
use super::evaluator::evaluate;
use crate::api::core::{ObjectMeta, PodSpec};
use crate::api::{Level, LevelVersion, Version};
use crate::errors::RegistrationError;
use std::collections::HashMap;

/// CheckRegistry is an ordered collection of checks, keyed by id.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: Vec<Check>,
    index: HashMap<&'static str, usize>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in check.
    pub fn with_default_checks() -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        checks::register_all_checks(&mut registry)?;
        Ok(registry)
    }

    /// Register the check produced by `factory`. Invalid checks are rejected
    /// here so that evaluation never sees them.
    pub fn add_check(&mut self, factory: CheckFactory) -> Result<(), RegistrationError> {
        let check = factory();
        validate_check(&check)?;
        if self.index.contains_key(check.id) {
            return Err(RegistrationError::DuplicateId {
                id: check.id.to_string(),
            });
        }

        tracing::debug!(
            check = check.id,
            level = %check.level,
            versions = check.versions.len(),
            "registered pod security check"
        );
        self.index.insert(check.id, self.checks.len());
        self.checks.push(check);
        Ok(())
    }

    /// Get a check by id.
    pub fn get(&self, id: &str) -> Option<&Check> {
        self.index.get(id).map(|&i| &self.checks[i])
    }

    /// All checks in registration order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|c| c.id)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The implementation of check `id` that applies at `version`, if any.
    pub fn resolve(&self, id: &str, version: Version) -> Option<&VersionedCheck> {
        self.get(id).and_then(|check| check.resolve(version))
    }

    /// Evaluate `pod_spec` against every check at or below the requested level.
    pub fn evaluate_pod(
        &self,
        lv: LevelVersion,
        pod_metadata: &ObjectMeta,
        pod_spec: &PodSpec,
        opts: &Options,
    ) -> Vec<CheckResult> {
        evaluate(&self.checks, lv.level, lv.version, pod_metadata, pod_spec, opts)
    }
}

fn validate_check(check: &Check) -> Result<(), RegistrationError> {
    if check.id.is_empty() {
        return Err(RegistrationError::EmptyId);
    }
    let id = || check.id.to_string();
    if check.level != Level::Baseline && check.level != Level::Restricted {
        return Err(RegistrationError::InvalidLevel { id: id() });
    }
    if check.versions.is_empty() {
        return Err(RegistrationError::NoVersions { id: id() });
    }

    let mut previous: Option<Version> = None;
    for versioned in &check.versions {
        let current = versioned.minimum_version;
        if current.is_latest() {
            return Err(RegistrationError::LatestMinimumVersion { id: id() });
        }
        if let Some(previous) = previous {
            if !previous.older(&current) {
                return Err(RegistrationError::NonIncreasingVersion {
                    id: id(),
                    previous,
                    current,
                });
            }
        }
        previous = Some(current);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn allow(_: &ObjectMeta, _: &PodSpec, _: &Options) -> CheckResult {
        CheckResult::allowed()
    }

    fn versioned(major: u32, minor: u32) -> VersionedCheck {
        VersionedCheck {
            minimum_version: Version::major_minor(major, minor),
            check_pod: allow,
        }
    }

    fn check_a() -> Check {
        Check {
            id: "a",
            level: Level::Baseline,
            versions: vec![versioned(1, 0)],
        }
    }

    fn check_b() -> Check {
        Check {
            id: "b",
            level: Level::Restricted,
            versions: vec![versioned(1, 0), versioned(1, 8)],
        }
    }

    fn check_b_again() -> Check {
        Check {
            id: "b",
            ..check_a()
        }
    }

    #[test]
    fn test_add_check_preserves_registration_order() {
        let mut registry = CheckRegistry::new();
        registry.add_check(check_b).unwrap();
        registry.add_check(check_a).unwrap();

        assert_eq!(registry.ids().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("a").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_add_check_rejects_duplicate_id() {
        let mut registry = CheckRegistry::new();
        registry.add_check(check_b).unwrap();
        assert_eq!(
            registry.add_check(check_b_again),
            Err(RegistrationError::DuplicateId { id: "b".to_string() })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_check_rejects_equal_minimum_versions() {
        fn equal_versions() -> Check {
            Check {
                id: "equal",
                level: Level::Baseline,
                versions: vec![versioned(1, 8), versioned(1, 8)],
            }
        }
        let mut registry = CheckRegistry::new();
        assert_eq!(
            registry.add_check(equal_versions),
            Err(RegistrationError::NonIncreasingVersion {
                id: "equal".to_string(),
                previous: Version::major_minor(1, 8),
                current: Version::major_minor(1, 8),
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_check_rejects_decreasing_minimum_versions() {
        fn decreasing() -> Check {
            Check {
                id: "decreasing",
                level: Level::Baseline,
                versions: vec![versioned(1, 8), versioned(1, 0)],
            }
        }
        let mut registry = CheckRegistry::new();
        assert!(matches!(
            registry.add_check(decreasing),
            Err(RegistrationError::NonIncreasingVersion { .. })
        ));
    }

    #[test]
    fn test_add_check_rejects_malformed_checks() {
        fn empty_id() -> Check {
            Check { id: "", ..check_a() }
        }
        fn privileged_level() -> Check {
            Check {
                level: Level::Privileged,
                ..check_a()
            }
        }
        fn no_versions() -> Check {
            Check {
                versions: vec![],
                ..check_a()
            }
        }
        fn latest_version() -> Check {
            Check {
                versions: vec![VersionedCheck {
                    minimum_version: Version::latest(),
                    check_pod: allow,
                }],
                ..check_a()
            }
        }

        let mut registry = CheckRegistry::new();
        assert_eq!(registry.add_check(empty_id), Err(RegistrationError::EmptyId));
        assert_eq!(
            registry.add_check(privileged_level),
            Err(RegistrationError::InvalidLevel { id: "a".to_string() })
        );
        assert_eq!(
            registry.add_check(no_versions),
            Err(RegistrationError::NoVersions { id: "a".to_string() })
        );
        assert_eq!(
            registry.add_check(latest_version),
            Err(RegistrationError::LatestMinimumVersion { id: "a".to_string() })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_by_id() {
        let mut registry = CheckRegistry::new();
        registry.add_check(check_b).unwrap();

        let resolved = registry.resolve("b", Version::major_minor(1, 10)).unwrap();
        assert_eq!(resolved.minimum_version, Version::major_minor(1, 8));
        assert!(registry.resolve("missing", Version::latest()).is_none());
    }

    #[test]
    fn test_with_default_checks_registers_catalogue() {
        let registry = CheckRegistry::with_default_checks().unwrap();
        assert_eq!(registry.len(), checks::default_checks().len());
        assert_eq!(registry.ids().next(), Some("hostNamespaces"));
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CheckRegistry>();

        let registry = std::sync::Arc::new(CheckRegistry::with_default_checks().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .evaluate_pod(
                            LevelVersion::new(Level::Restricted, Version::latest()),
                            &ObjectMeta::default(),
                            &PodSpec::default(),
                            &Options::default(),
                        )
                        .len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), registry.len());
        }
    }

    proptest! {
        #[test]
        fn prop_resolve_selects_greatest_version_not_above_target(
            minors in prop::collection::btree_set(0u32..40, 1..6),
            target in 0u32..50,
        ) {
            let minors: Vec<u32> = minors.into_iter().collect();
            let check = Check {
                id: "generated",
                level: Level::Baseline,
                versions: minors.iter().map(|&m| versioned(1, m)).collect(),
            };
            prop_assert!(validate_check(&check).is_ok());

            let expected = minors.iter().rev().find(|&&m| m <= target).copied();
            let resolved = check
                .resolve(Version::major_minor(1, target))
                .map(|vc| vc.minimum_version.minor());
            prop_assert_eq!(resolved, expected);
        }
    }
}
