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

//! In addition to restricting HostPath volumes, the restricted profile limits
//! usage of inline pod volume sources to:
//! configMap, csi, downwardAPI, emptyDir, ephemeral, persistentVolumeClaim,
//! projected, secret and image.
//!
//! Restricted fields: `spec.volumes[*]`.
//!
//! Allowed values: undefined or one of the sources above. A volume with no
//! recognized source is reported as `unknown`.

use std::collections::BTreeSet;

use crate::api::core::{ObjectMeta, PodSpec, VolumeSource};
use crate::api::{Level, Version};
use crate::policy::check::{join_quote, pluralize, Check, CheckResult, Options, VersionedCheck};
use crate::policy::paths::{requested_path, volumes_path};
use crate::policy::violations::{forbidden, Violations};

pub fn check_restricted_volumes() -> Check {
    Check {
        id: "restrictedVolumes",
        level: Level::Restricted,
        versions: vec![VersionedCheck {
            minimum_version: Version::major_minor(1, 0),
            check_pod: restricted_volumes_v1_0,
        }],
    }
}

fn allowed_volume_source(source: VolumeSource) -> bool {
    matches!(
        source,
        VolumeSource::ConfigMap
            | VolumeSource::Csi
            | VolumeSource::DownwardApi
            | VolumeSource::EmptyDir
            | VolumeSource::Ephemeral
            | VolumeSource::PersistentVolumeClaim
            | VolumeSource::Projected
            | VolumeSource::Secret
            | VolumeSource::Image
    )
}

fn restricted_volumes_v1_0(
    _pod_metadata: &ObjectMeta,
    pod_spec: &PodSpec,
    opts: &Options,
) -> CheckResult {
    let mut bad_volumes = Violations::new(opts.with_field_errors);
    let mut bad_volume_types = BTreeSet::new();
    let volumes = requested_path(opts, volumes_path);

    for (i, volume) in pod_spec.volumes.iter().enumerate() {
        if allowed_volume_source(volume.volume_source) {
            continue;
        }
        let field_name = volume.volume_source.field_name();
        bad_volume_types.insert(field_name);
        bad_volumes.add_with_errors(
            volume.name.as_str(),
            Some(forbidden(volumes.index(i).child(field_name))),
        );
    }

    if bad_volumes.is_empty() {
        return CheckResult::allowed();
    }
    let bad_volume_types: Vec<&str> = bad_volume_types.into_iter().collect();
    let detail = format!(
        "{} {} {} {} {}",
        pluralize("volume", "volumes", bad_volumes.len()),
        join_quote(bad_volumes.data()),
        pluralize("uses", "use", bad_volumes.len()),
        pluralize(
            "restricted volume type",
            "restricted volume types",
            bad_volume_types.len()
        ),
        join_quote(&bad_volume_types),
    );
    CheckResult::forbidden("restricted volume types", detail, bad_volumes.into_errs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::core::Volume;
    use crate::field::FieldErrorType;
    use serde_json::json;

    const ALLOWED: [VolumeSource; 9] = [
        VolumeSource::EmptyDir,
        VolumeSource::Secret,
        VolumeSource::PersistentVolumeClaim,
        VolumeSource::DownwardApi,
        VolumeSource::ConfigMap,
        VolumeSource::Projected,
        VolumeSource::Csi,
        VolumeSource::Ephemeral,
        VolumeSource::Image,
    ];

    const RESTRICTED: [VolumeSource; 22] = [
        VolumeSource::HostPath,
        VolumeSource::GcePersistentDisk,
        VolumeSource::AwsElasticBlockStore,
        VolumeSource::GitRepo,
        VolumeSource::Nfs,
        VolumeSource::Iscsi,
        VolumeSource::Glusterfs,
        VolumeSource::Rbd,
        VolumeSource::FlexVolume,
        VolumeSource::Cinder,
        VolumeSource::CephFs,
        VolumeSource::Flocker,
        VolumeSource::Fc,
        VolumeSource::AzureFile,
        VolumeSource::VsphereVolume,
        VolumeSource::Quobyte,
        VolumeSource::AzureDisk,
        VolumeSource::PhotonPersistentDisk,
        VolumeSource::PortworxVolume,
        VolumeSource::ScaleIo,
        VolumeSource::StorageOs,
        VolumeSource::Unknown,
    ];

    fn all_volumes() -> PodSpec {
        let allowed = ALLOWED
            .iter()
            .enumerate()
            .map(|(i, &source)| Volume::new(&format!("a{}", i + 1), source));
        let restricted = RESTRICTED
            .iter()
            .enumerate()
            .map(|(i, &source)| Volume::new(&format!("b{}", i + 1), source));
        PodSpec {
            volumes: allowed.chain(restricted).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_restricted_volumes() {
        let result = restricted_volumes_v1_0(&ObjectMeta::default(), &all_volumes(), &Options::default());
        assert!(!result.allowed);
        assert_eq!(result.forbidden_reason, "restricted volume types");
        assert_eq!(
            result.forbidden_detail,
            concat!(
                r#"volumes "b1", "b2", "b3", "b4", "b5", "b6", "b7", "b8", "b9", "b10", "b11", "#,
                r#""b12", "b13", "b14", "b15", "b16", "b17", "b18", "b19", "b20", "b21", "b22""#,
                r#" use restricted volume types "#,
                r#""awsElasticBlockStore", "azureDisk", "azureFile", "cephfs", "cinder", "fc", "#,
                r#""flexVolume", "flocker", "gcePersistentDisk", "gitRepo", "glusterfs", "hostPath", "#,
                r#""iscsi", "nfs", "photonPersistentDisk", "portworxVolume", "quobyte", "rbd", "#,
                r#""scaleIO", "storageos", "unknown", "vsphereVolume""#,
            )
        );
        assert!(result.err_list.is_none());
    }

    #[test]
    fn test_restricted_volumes_field_errors() {
        let result = restricted_volumes_v1_0(
            &ObjectMeta::default(),
            &all_volumes(),
            &Options {
                with_field_errors: true,
            },
        );
        let errs = result.err_list.unwrap();
        assert_eq!(errs.len(), RESTRICTED.len());
        assert_eq!(errs[0].error_type, FieldErrorType::Forbidden);
        assert_eq!(errs[0].field, "spec.volumes[9].hostPath");
        assert_eq!(errs[0].bad_value, json!(""));
        assert_eq!(errs[19].field, "spec.volumes[28].scaleIO");
        assert_eq!(errs[21].field, "spec.volumes[30].unknown");
    }

    #[test]
    fn test_single_restricted_volume() {
        let spec = PodSpec {
            volumes: vec![
                Volume::new("config", VolumeSource::ConfigMap),
                Volume::new("host", VolumeSource::HostPath),
            ],
            ..Default::default()
        };
        let result = restricted_volumes_v1_0(&ObjectMeta::default(), &spec, &Options::default());
        assert_eq!(
            result.forbidden_detail,
            r#"volume "host" uses restricted volume type "hostPath""#
        );
    }

    #[test]
    fn test_allowed_volumes() {
        let spec = PodSpec {
            volumes: ALLOWED
                .iter()
                .map(|&source| Volume::new(source.field_name(), source))
                .collect(),
            ..Default::default()
        };
        assert!(restricted_volumes_v1_0(&ObjectMeta::default(), &spec, &Options::default()).allowed);
    }
}
