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

//! Structured field errors.
//!
//! A [`FieldError`] points at the exact offending field of an object, using the
//! Kubernetes field path grammar (`spec.containers[3].securityContext.procMount`,
//! `metadata.annotations[key]`), and carries the bad value found there.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Path is a rendered field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    /// Create a root path.
    pub fn new(name: &str) -> Self {
        Path(name.to_string())
    }

    /// Append a field name: `parent.name`.
    pub fn child(mut self, name: &str) -> Self {
        if !self.0.is_empty() {
            self.0.push('.');
        }
        self.0.push_str(name);
        self
    }

    /// Append a list index: `parent[index]`.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push('[');
        self.0.push_str(&index.to_string());
        self.0.push(']');
        self
    }

    /// Append a map key: `parent[key]`.
    pub fn key(mut self, key: &str) -> Self {
        self.0.push('[');
        self.0.push_str(key);
        self.0.push(']');
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// FieldErrorType represents the type of field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldErrorType {
    /// Forbidden indicates the field is set to a value the policy disallows.
    #[serde(rename = "FieldValueForbidden")]
    Forbidden,
    /// Required indicates a required field is missing.
    #[serde(rename = "FieldValueRequired")]
    Required,
}

impl FieldErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorType::Forbidden => "Forbidden",
            FieldErrorType::Required => "Required value",
        }
    }
}

/// FieldError represents a field-level error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[serde(rename = "type")]
    pub error_type: FieldErrorType,
    pub field: String,
    pub bad_value: Value,
    pub detail: String,
}

impl FieldError {
    /// Create a forbidden field error. The bad value starts out empty.
    pub fn forbidden(path: &Path, detail: impl Into<String>) -> Self {
        Self::new(FieldErrorType::Forbidden, path, detail)
    }

    /// Create a required field error. The bad value starts out empty.
    pub fn required(path: &Path, detail: impl Into<String>) -> Self {
        Self::new(FieldErrorType::Required, path, detail)
    }

    fn new(error_type: FieldErrorType, path: &Path, detail: impl Into<String>) -> Self {
        Self {
            error_type,
            field: path.to_string(),
            bad_value: Value::String(String::new()),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error_type.as_str())?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// ErrorList holds a set of field errors.
pub type ErrorList = Vec<FieldError>;
