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

//! Built-in Pod Security Standards checks.

pub mod allow_privilege_escalation;
pub mod app_armor_profile;
pub mod capabilities;
pub mod host_namespaces;
pub mod host_ports;
pub mod privileged;
pub mod proc_mount;
pub mod restricted_volumes;
pub mod run_as_non_root;
pub mod selinux_options;

use super::check::CheckFactory;
use super::registry::CheckRegistry;
use crate::errors::RegistrationError;

/// All built-in checks in registration order. Baseline checks come first,
/// which is also the order failures are reported in.
pub fn default_checks() -> Vec<CheckFactory> {
    vec![
        host_namespaces::check_host_namespaces,
        privileged::check_privileged,
        host_ports::check_host_ports,
        proc_mount::check_proc_mount,
        app_armor_profile::check_app_armor_profile,
        selinux_options::check_selinux_options,
        restricted_volumes::check_restricted_volumes,
        allow_privilege_escalation::check_allow_privilege_escalation,
        run_as_non_root::check_run_as_non_root,
        capabilities::check_capabilities_restricted,
    ]
}

/// Register all built-in checks.
pub fn register_all_checks(registry: &mut CheckRegistry) -> Result<(), RegistrationError> {
    for factory in default_checks() {
        registry.add_check(factory)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Level;

    #[test]
    fn test_register_all_checks() {
        let mut registry = CheckRegistry::new();
        register_all_checks(&mut registry).unwrap();
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            [
                "hostNamespaces",
                "privileged",
                "hostPorts",
                "procMount",
                "appArmorProfile",
                "seLinuxOptions",
                "restrictedVolumes",
                "allowPrivilegeEscalation",
                "runAsNonRoot",
                "capabilities",
            ]
        );
    }

    #[test]
    fn test_baseline_checks_come_first() {
        let registry = CheckRegistry::with_default_checks().unwrap();
        let levels: Vec<Level> = registry.checks().iter().map(|c| c.level).collect();
        let mut sorted = levels.clone();
        sorted.sort();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = CheckRegistry::new();
        register_all_checks(&mut registry).unwrap();
        assert!(matches!(
            register_all_checks(&mut registry),
            Err(RegistrationError::DuplicateId { .. })
        ));
    }
}
