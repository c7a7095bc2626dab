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

//! Lazily rendered field paths.
//!
//! A [`PathFn`] records how to reach a field without rendering the path. Checks
//! only resolve it when a field error is actually recorded, and the absent
//! variant short-circuits every builder call, so traversal with field errors
//! disabled never allocates for paths.

use super::check::Options;
use crate::field::Path;
use std::rc::Rc;

#[derive(Debug)]
enum Segment {
    Child(&'static str),
    Index(usize),
    Key(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<Rc<Node>>,
    segment: Segment,
}

/// PathFn is a deferred field path. It is either absent or a chain of segments
/// that [`resolve`](PathFn::resolve) renders into a [`Path`].
#[derive(Debug, Clone, Default)]
pub struct PathFn(Option<Rc<Node>>);

impl PathFn {
    /// The absent path. Every composition of it stays absent.
    pub const ABSENT: PathFn = PathFn(None);

    /// Create a root path.
    pub fn root(name: &'static str) -> Self {
        PathFn(Some(Rc::new(Node {
            parent: None,
            segment: Segment::Child(name),
        })))
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    fn extend(&self, segment: Segment) -> Self {
        match &self.0 {
            None => PathFn::ABSENT,
            Some(parent) => PathFn(Some(Rc::new(Node {
                parent: Some(Rc::clone(parent)),
                segment,
            }))),
        }
    }

    pub fn child(&self, name: &'static str) -> Self {
        self.extend(Segment::Child(name))
    }

    /// Append several field names at once, e.g. `["securityContext", "procMount"]`.
    pub fn child_path(&self, names: &[&'static str]) -> Self {
        names.iter().fold(self.clone(), |path, &name| path.child(name))
    }

    pub fn index(&self, index: usize) -> Self {
        self.extend(Segment::Index(index))
    }

    pub fn key(&self, key: &str) -> Self {
        if self.is_absent() {
            return PathFn::ABSENT;
        }
        self.extend(Segment::Key(key.to_string()))
    }

    /// Render the path, or `None` if it is absent.
    pub fn resolve(&self) -> Option<Path> {
        let mut segments = Vec::new();
        let mut node = self.0.as_deref();
        while let Some(n) = node {
            segments.push(&n.segment);
            node = n.parent.as_deref();
        }

        let mut path = Path::new("");
        for segment in segments.into_iter().rev() {
            path = match segment {
                Segment::Child(name) => path.child(name),
                Segment::Index(index) => path.index(*index),
                Segment::Key(key) => path.key(key),
            };
        }
        (!self.is_absent()).then_some(path)
    }
}

/// Build `path` only if field errors were requested, otherwise the absent path.
pub(crate) fn requested_path(opts: &Options, path: fn() -> PathFn) -> PathFn {
    if opts.with_field_errors {
        path()
    } else {
        PathFn::ABSENT
    }
}

pub(crate) fn annotations_path() -> PathFn {
    PathFn::root("metadata").child("annotations")
}

pub(crate) fn spec_path() -> PathFn {
    PathFn::root("spec")
}

pub(crate) fn init_containers_path() -> PathFn {
    spec_path().child("initContainers")
}

pub(crate) fn containers_path() -> PathFn {
    spec_path().child("containers")
}

pub(crate) fn ephemeral_containers_path() -> PathFn {
    spec_path().child("ephemeralContainers")
}

pub(crate) fn security_context_path() -> PathFn {
    spec_path().child("securityContext")
}

pub(crate) fn host_network_path() -> PathFn {
    spec_path().child("hostNetwork")
}

pub(crate) fn host_pid_path() -> PathFn {
    spec_path().child("hostPID")
}

pub(crate) fn host_ipc_path() -> PathFn {
    spec_path().child("hostIPC")
}

pub(crate) fn volumes_path() -> PathFn {
    spec_path().child("volumes")
}

pub(crate) fn run_as_non_root_path() -> PathFn {
    security_context_path().child("runAsNonRoot")
}

pub(crate) fn se_linux_options_type_path() -> PathFn {
    security_context_path().child_path(&["seLinuxOptions", "type"])
}

pub(crate) fn se_linux_options_user_path() -> PathFn {
    security_context_path().child_path(&["seLinuxOptions", "user"])
}

pub(crate) fn se_linux_options_role_path() -> PathFn {
    security_context_path().child_path(&["seLinuxOptions", "role"])
}
