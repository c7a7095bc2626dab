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

//! The versioned check framework.
//!
//! A [`Check`] has an id, the least strict [`Level`](crate::api::Level) it
//! belongs to, and one [`VersionedCheck`] per policy version in which its
//! behavior changed. The [`CheckRegistry`] holds checks in registration order,
//! [`evaluate`] runs the implementation that applies at the requested version,
//! and [`aggregate_check_results`] folds the results into a [`Verdict`].

pub mod aggregate;
pub mod check;
pub mod checks;
pub mod evaluator;
pub mod paths;
pub mod registry;
pub mod relax;
pub mod violations;
mod visitor;

pub use aggregate::{aggregate_check_results, Verdict};
pub use check::{
    join_quote, pluralize, quote, Check, CheckFactory, CheckPodFn, CheckResult, Options,
    VersionedCheck,
};
pub use checks::{default_checks, register_all_checks};
pub use evaluator::evaluate;
pub use paths::PathFn;
pub use registry::CheckRegistry;
pub use relax::{relax_policy_for_user_namespace_pods, relaxing_policy_for_user_namespace_pods};
pub use violations::{forbidden, required, ErrFn, Violations};
