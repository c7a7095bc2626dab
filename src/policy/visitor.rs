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

use super::check::Options;
use super::paths::{
    containers_path, ephemeral_containers_path, init_containers_path, requested_path, PathFn,
};
use crate::api::core::{Container, PodSpec};

/// Visit every init, regular and ephemeral container, in that order.
///
/// The visitor receives the path to the container, which is absent unless
/// field errors were requested.
pub(crate) fn visit_containers<F>(pod_spec: &PodSpec, opts: &Options, mut visitor: F)
where
    F: FnMut(&Container, PathFn),
{
    let init_path = requested_path(opts, init_containers_path);
    for (i, container) in pod_spec.init_containers.iter().enumerate() {
        visitor(container, init_path.index(i));
    }
    let regular_path = requested_path(opts, containers_path);
    for (i, container) in pod_spec.containers.iter().enumerate() {
        visitor(container, regular_path.index(i));
    }
    let ephemeral_path = requested_path(opts, ephemeral_containers_path);
    for (i, container) in pod_spec.ephemeral_containers.iter().enumerate() {
        visitor(container, ephemeral_path.index(i));
    }
}
