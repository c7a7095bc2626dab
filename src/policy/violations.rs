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

//! Per-check violation accumulator.

use super::paths::PathFn;
use crate::field::{ErrorList, FieldError, FieldErrorType};
use serde_json::Value;

/// ErrFn is a deferred field error constructor. It resolves to nothing when
/// its path is absent.
#[derive(Debug, Clone)]
pub struct ErrFn {
    path: PathFn,
    error_type: FieldErrorType,
    bad_value: Option<Value>,
}

/// A field that is set to a disallowed value.
pub fn forbidden(path: PathFn) -> ErrFn {
    ErrFn {
        path,
        error_type: FieldErrorType::Forbidden,
        bad_value: None,
    }
}

/// A mandatory field that is not set.
pub fn required(path: PathFn) -> ErrFn {
    ErrFn {
        path,
        error_type: FieldErrorType::Required,
        bad_value: None,
    }
}

impl ErrFn {
    /// Attach the offending value. The value is not converted if the path is absent.
    pub fn with_bad_value(mut self, bad_value: impl Into<Value>) -> Self {
        if !self.path.is_absent() {
            self.bad_value = Some(bad_value.into());
        }
        self
    }

    /// Like [`ErrFn::with_bad_value`], for values that are costly to build.
    /// `bad_value` is only called if the path is present.
    pub fn with_bad_value_fn<V: Into<Value>>(mut self, bad_value: impl FnOnce() -> V) -> Self {
        if !self.path.is_absent() {
            self.bad_value = Some(bad_value().into());
        }
        self
    }

    pub fn resolve(self) -> Option<FieldError> {
        let path = self.path.resolve()?;
        let mut err = match self.error_type {
            FieldErrorType::Forbidden => FieldError::forbidden(&path, ""),
            FieldErrorType::Required => FieldError::required(&path, ""),
        };
        if let Some(bad_value) = self.bad_value {
            err.bad_value = bad_value;
        }
        Some(err)
    }
}

/// Violations collects the labels of everything a check found at fault (usually
/// container names) and, when field errors were requested, the matching
/// structured errors.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    data: Vec<String>,
    errs: Option<ErrorList>,
}

impl Violations {
    pub fn new(with_field_errors: bool) -> Self {
        Self {
            data: Vec::new(),
            errs: with_field_errors.then(ErrorList::new),
        }
    }

    /// Record a violation without field errors.
    pub fn add(&mut self, label: impl Into<String>) {
        self.data.push(label.into());
    }

    /// Record a violation. The error constructors are only resolved when
    /// field errors are enabled.
    pub fn add_with_errors(
        &mut self,
        label: impl Into<String>,
        err_fns: impl IntoIterator<Item = ErrFn>,
    ) {
        self.data.push(label.into());
        if let Some(errs) = self.errs.as_mut() {
            errs.extend(err_fns.into_iter().filter_map(ErrFn::resolve));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Labels in insertion order.
    pub fn data(&self) -> &[String] {
        &self.data
    }

    pub fn errs(&self) -> Option<&ErrorList> {
        self.errs.as_ref()
    }

    pub fn into_errs(self) -> Option<ErrorList> {
        self.errs
    }
}

/// Concatenate the error lists of two accumulators of the same check.
pub(crate) fn merge_errs(first: Option<ErrorList>, second: Option<ErrorList>) -> Option<ErrorList> {
    match (first, second) {
        (Some(mut first), Some(second)) => {
            first.extend(second);
            Some(first)
        }
        (first, second) => first.or(second),
    }
}
