//! Errors raised while compiling a path or walking a tree with it.

use serde_json::Value;
use thiserror::Error;

use crate::path::Path;
use crate::types::{Step, ValueKind};

/// Every failure carries the complete path text as given by the caller, so a
/// multi-level failure is diagnosable without re-deriving the broken step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CutError {
    /// Bracket syntax is structurally broken: a fragment not closed by `]`,
    /// a stray `]`, or an empty index `[]`.
    #[error("key '{segment}' in path '{path}' is badly formatted")]
    MalformedPath { segment: String, path: String },

    /// Balanced brackets around something that is not a strict, non-negative
    /// base-10 integer.
    #[error(
        "unable to access item '{fragment}' in path '{path}': \
         only non-negative integers can index a sequence"
    )]
    NonIntegerIndex { fragment: String, path: String },

    #[error("cannot access key '{key}' in path '{path}': key not found")]
    KeyNotFound { key: String, path: String },

    #[error(
        "cannot access index '{index}' in path '{path}': \
         index out of range for a sequence of length {len}"
    )]
    IndexOutOfRange {
        index: usize,
        len: usize,
        path: String,
    },

    /// The step kind does not match the container, or the value is a scalar.
    #[error(
        "cannot access {} in path '{path}': the element must be a {} but is of type '{found}'",
        .step.describe(),
        .step.expected_kind()
    )]
    TypeMismatch {
        step: Step,
        path: String,
        found: ValueKind,
    },
}

impl CutError {
    pub(crate) fn key_not_found(key: &str, path: &Path) -> Self {
        CutError::KeyNotFound {
            key: key.to_string(),
            path: path.source().to_string(),
        }
    }

    pub(crate) fn index_out_of_range(index: usize, len: usize, path: &Path) -> Self {
        CutError::IndexOutOfRange {
            index,
            len,
            path: path.source().to_string(),
        }
    }

    pub(crate) fn type_mismatch(step: &Step, path: &Path, found: &Value) -> Self {
        CutError::TypeMismatch {
            step: step.clone(),
            path: path.source().to_string(),
            found: ValueKind::of(found),
        }
    }

    /// Check if this error only reports an absent slot.
    ///
    /// Default-bearing operations swallow these and nothing else.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CutError::KeyNotFound { .. } | CutError::IndexOutOfRange { .. }
        )
    }

    /// Check if this error was raised while compiling the path.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            CutError::MalformedPath { .. } | CutError::NonIntegerIndex { .. }
        )
    }

    /// The full path text the failing operation was given.
    pub fn path(&self) -> &str {
        match self {
            CutError::MalformedPath { path, .. }
            | CutError::NonIntegerIndex { path, .. }
            | CutError::KeyNotFound { path, .. }
            | CutError::IndexOutOfRange { path, .. }
            | CutError::TypeMismatch { path, .. } => path,
        }
    }
}
