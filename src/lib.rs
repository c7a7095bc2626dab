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

//! Pod Security Standards evaluated in Rust.
//!
//! This crate provides the versioned check framework behind the PodSecurity
//! admission controller: leveled, version-gated checks, a registry that resolves
//! the right implementation for a policy version, and an aggregator that folds
//! per-check results into one deterministic verdict.

pub mod admission;
pub mod api;
pub mod config;
pub mod errors;
pub mod field;
pub mod policy;

// Re-export commonly used types
pub use admission::{AdmissionError, AdmissionResult, PodSecurity};
pub use api::core::{Container, ObjectMeta, Pod, PodSpec, SecurityContext, Volume};
pub use api::{Level, LevelVersion, Version};
pub use config::PolicyConfig;
pub use errors::{ParseError, RegistrationError};
pub use field::{ErrorList, FieldError, FieldErrorType, Path};
pub use policy::{
    aggregate_check_results, evaluate, relax_policy_for_user_namespace_pods, Check, CheckRegistry,
    CheckResult, Options, Verdict, VersionedCheck,
};
