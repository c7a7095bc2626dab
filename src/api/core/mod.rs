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

//! Core Kubernetes API types (Pod, Container, Volume) restricted to the fields
//! the pod security checks read.

use std::collections::BTreeMap;

// ============================================================================
// Constants
// ============================================================================

/// Annotation key prefix for per-container AppArmor profiles.
pub const APPARMOR_BETA_CONTAINER_ANNOTATION_KEY_PREFIX: &str =
    "container.apparmor.security.beta.kubernetes.io/";

/// AppArmor profile that selects the container runtime's default profile.
pub const APPARMOR_BETA_PROFILE_RUNTIME_DEFAULT: &str = "runtime/default";

/// AppArmor profile prefix for profiles loaded on the node.
pub const APPARMOR_BETA_PROFILE_NAME_PREFIX: &str = "localhost/";

// ============================================================================
// ObjectMeta
// ============================================================================

/// ObjectMeta is the subset of object metadata visible to pod security checks.
///
/// Labels and annotations use ordered maps so that checks iterating over them
/// produce the same output on every run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectMeta {
    /// Name of the object.
    pub name: String,
    /// Namespace of the object.
    pub namespace: String,
    /// Labels is a map of string keys and values.
    pub labels: BTreeMap<String, String>,
    /// Annotations is an unstructured key value map.
    pub annotations: BTreeMap<String, String>,
}

// ============================================================================
// Security Context Types
// ============================================================================

/// ProcMountType denotes the type of proc mount to use for a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProcMountType {
    /// Default uses the container runtime defaults for readonly and masked paths.
    #[default]
    Default,
    /// Unmasked bypasses the default masking behavior of the container runtime.
    Unmasked,
    /// Any value the API does not define.
    Other(String),
}

impl ProcMountType {
    pub fn as_str(&self) -> &str {
        match self {
            ProcMountType::Default => "Default",
            ProcMountType::Unmasked => "Unmasked",
            ProcMountType::Other(s) => s,
        }
    }
}

impl From<&str> for ProcMountType {
    fn from(s: &str) -> Self {
        match s {
            "Default" => ProcMountType::Default,
            "Unmasked" => ProcMountType::Unmasked,
            other => ProcMountType::Other(other.to_string()),
        }
    }
}

/// Capabilities adds and removes POSIX capabilities from running containers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Capabilities {
    /// Added capabilities.
    pub add: Vec<String>,
    /// Removed capabilities.
    pub drop: Vec<String>,
}

/// SELinuxOptions are the labels to be applied to the container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SELinuxOptions {
    pub user: String,
    pub role: String,
    pub type_: String,
    pub level: String,
}

/// SecurityContext holds container-level security attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SecurityContext {
    pub privileged: Option<bool>,
    pub allow_privilege_escalation: Option<bool>,
    pub run_as_non_root: Option<bool>,
    pub proc_mount: Option<ProcMountType>,
    pub capabilities: Option<Capabilities>,
    pub se_linux_options: Option<SELinuxOptions>,
}

/// PodSecurityContext holds pod-level security attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodSecurityContext {
    pub run_as_non_root: Option<bool>,
    pub se_linux_options: Option<SELinuxOptions>,
}

// ============================================================================
// Container
// ============================================================================

/// ContainerPort represents a network port in a single container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerPort {
    /// Port number to expose on the pod's IP address.
    pub container_port: i32,
    /// Port number to expose on the host. Zero means unset.
    pub host_port: i32,
}

impl ContainerPort {
    pub fn new(container_port: i32, host_port: i32) -> Self {
        Self {
            container_port,
            host_port,
        }
    }
}

/// Container represents a single container in a pod.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    /// Name of the container.
    pub name: String,
    /// Container image name.
    pub image: String,
    /// Ports to expose from the container.
    pub ports: Vec<ContainerPort>,
    /// Security options the container should run with.
    pub security_context: Option<SecurityContext>,
}

impl Container {
    /// Create a new container with the given name and image.
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            ..Default::default()
        }
    }

    /// Create a new container with the given security context.
    pub fn with_security_context(name: &str, security_context: SecurityContext) -> Self {
        Self {
            name: name.to_string(),
            security_context: Some(security_context),
            ..Default::default()
        }
    }
}

// ============================================================================
// Volume Types
// ============================================================================

/// VolumeSource identifies which kind of storage backs a volume.
///
/// Only the kind matters to pod security, so the source-specific settings are
/// not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VolumeSource {
    // Volume kinds allowed by the restricted policy.
    ConfigMap,
    Csi,
    DownwardApi,
    EmptyDir,
    Ephemeral,
    PersistentVolumeClaim,
    Projected,
    Secret,
    Image,
    // Volume kinds forbidden by the restricted policy.
    HostPath,
    GcePersistentDisk,
    AwsElasticBlockStore,
    GitRepo,
    Nfs,
    Iscsi,
    Glusterfs,
    Rbd,
    FlexVolume,
    Cinder,
    CephFs,
    Flocker,
    Fc,
    AzureFile,
    VsphereVolume,
    Quobyte,
    AzureDisk,
    PhotonPersistentDisk,
    PortworxVolume,
    ScaleIo,
    StorageOs,
    /// No source set.
    #[default]
    Unknown,
}

impl VolumeSource {
    /// Returns the API field name of this source, as it appears under `spec.volumes[*]`.
    pub fn field_name(&self) -> &'static str {
        match self {
            VolumeSource::ConfigMap => "configMap",
            VolumeSource::Csi => "csi",
            VolumeSource::DownwardApi => "downwardAPI",
            VolumeSource::EmptyDir => "emptyDir",
            VolumeSource::Ephemeral => "ephemeral",
            VolumeSource::PersistentVolumeClaim => "persistentVolumeClaim",
            VolumeSource::Projected => "projected",
            VolumeSource::Secret => "secret",
            VolumeSource::Image => "image",
            VolumeSource::HostPath => "hostPath",
            VolumeSource::GcePersistentDisk => "gcePersistentDisk",
            VolumeSource::AwsElasticBlockStore => "awsElasticBlockStore",
            VolumeSource::GitRepo => "gitRepo",
            VolumeSource::Nfs => "nfs",
            VolumeSource::Iscsi => "iscsi",
            VolumeSource::Glusterfs => "glusterfs",
            VolumeSource::Rbd => "rbd",
            VolumeSource::FlexVolume => "flexVolume",
            VolumeSource::Cinder => "cinder",
            VolumeSource::CephFs => "cephfs",
            VolumeSource::Flocker => "flocker",
            VolumeSource::Fc => "fc",
            VolumeSource::AzureFile => "azureFile",
            VolumeSource::VsphereVolume => "vsphereVolume",
            VolumeSource::Quobyte => "quobyte",
            VolumeSource::AzureDisk => "azureDisk",
            VolumeSource::PhotonPersistentDisk => "photonPersistentDisk",
            VolumeSource::PortworxVolume => "portworxVolume",
            VolumeSource::ScaleIo => "scaleIO",
            VolumeSource::StorageOs => "storageos",
            VolumeSource::Unknown => "unknown",
        }
    }
}

/// Volume represents a volume in a pod.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Volume {
    /// Name of the volume.
    pub name: String,
    /// Volume source.
    pub volume_source: VolumeSource,
}

impl Volume {
    /// Create a new volume with the given name and source.
    pub fn new(name: &str, volume_source: VolumeSource) -> Self {
        Self {
            name: name.to_string(),
            volume_source,
        }
    }
}

// ============================================================================
// PodSpec
// ============================================================================

/// PodSpec describes the specification of a pod.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodSpec {
    /// List of initialization containers.
    pub init_containers: Vec<Container>,
    /// List of containers.
    pub containers: Vec<Container>,
    /// List of ephemeral containers.
    pub ephemeral_containers: Vec<Container>,
    /// List of volumes.
    pub volumes: Vec<Volume>,
    /// Pod-level security attributes.
    pub security_context: Option<PodSecurityContext>,
    /// Use the host's network namespace.
    pub host_network: bool,
    /// Use the host's pid namespace.
    pub host_pid: bool,
    /// Use the host's ipc namespace.
    pub host_ipc: bool,
    /// Use the host's user namespace. `Some(false)` requests a new user namespace.
    pub host_users: Option<bool>,
}

// ============================================================================
// Pod
// ============================================================================

/// Pod represents a Kubernetes Pod.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pod {
    /// Standard object metadata.
    pub metadata: ObjectMeta,
    /// Pod specification.
    pub spec: PodSpec,
}

impl Pod {
    /// Create a new pod with the given name and namespace.
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
                ..Default::default()
            },
            spec: PodSpec::default(),
        }
    }
}
