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

//! Admission adapter.
//!
//! [`PodSecurity`] turns a verdict into the admission outcome an API server
//! would return: allowed pods pass through, denied pods become a
//! [`AdmissionError::Forbidden`] carrying the rendered message and the
//! structured field errors.

use std::sync::Arc;

use thiserror::Error;

use crate::api::core::Pod;
use crate::api::LevelVersion;
use crate::field::ErrorList;
use crate::policy::{aggregate_check_results, quote, CheckRegistry, Options, Verdict};

/// Result type for admission operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// AdmissionError represents a rejected admission request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    /// Forbidden indicates the pod violates the enforced policy.
    #[error("{message}")]
    Forbidden {
        message: String,
        /// Field errors, present only when they were requested.
        causes: ErrorList,
    },
}

impl AdmissionError {
    /// Field errors behind the rejection.
    pub fn causes(&self) -> &ErrorList {
        match self {
            AdmissionError::Forbidden { causes, .. } => causes,
        }
    }
}

/// PodSecurity validates pods against a shared check registry.
#[derive(Debug, Clone)]
pub struct PodSecurity {
    registry: Arc<CheckRegistry>,
}

impl PodSecurity {
    pub fn new(registry: Arc<CheckRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Evaluate `pod` at `level_version` and return the verdict if it is
    /// allowed.
    pub fn validate(
        &self,
        pod: &Pod,
        level_version: LevelVersion,
        opts: &Options,
    ) -> AdmissionResult<Verdict> {
        let results = self.registry.evaluate_pod(
            level_version,
            &pod.metadata,
            &pod.spec,
            opts,
        );
        let verdict = aggregate_check_results(results);
        if verdict.allowed {
            return Ok(verdict);
        }

        tracing::debug!(
            pod = %pod.metadata.name,
            namespace = %pod.metadata.namespace,
            policy = %level_version,
            reason = %verdict.forbidden_reason(),
            "pod denied by pod security policy"
        );
        let message = format!(
            "pods {} is forbidden: violates PodSecurity \"{}\": {}",
            quote(&pod.metadata.name),
            level_version,
            verdict.forbidden_detail(),
        );
        Err(AdmissionError::Forbidden {
            message,
            causes: verdict.err_list.unwrap_or_default(),
        })
    }
}
