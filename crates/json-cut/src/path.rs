//! Path compiler.
//!
//! Turns a flattened path such as `users[0].profile.name` into an ordered
//! list of [`Step`]s. Top-level segments are split on a configurable
//! separator first; bracket indices are parsed within each segment.

use std::fmt;

use crate::error::CutError;
use crate::types::Step;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '.';

/// A compiled path.
///
/// Holds the steps and the source text it was compiled from, which is only
/// used to report errors. A compiled path is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    source: String,
    steps: Vec<Step>,
}

impl Path {
    /// Compile a path string.
    ///
    /// # Errors
    ///
    /// - [`CutError::MalformedPath`] if a bracket is left open, a stray `]`
    ///   follows an index, or an index is empty (`a[]`)
    /// - [`CutError::NonIntegerIndex`] if the bracket content is not a strict,
    ///   non-negative integer
    ///
    /// # Example
    ///
    /// ```
    /// use json_cut::{Path, Step};
    ///
    /// let path = Path::compile("users[0].name", '.').unwrap();
    /// assert_eq!(
    ///     path.steps(),
    ///     &[
    ///         Step::Key("users".to_string()),
    ///         Step::Index(0),
    ///         Step::Key("name".to_string()),
    ///     ]
    /// );
    ///
    /// assert!(Path::compile("users[-1]", '.').is_err());
    /// assert!(Path::compile("users[0", '.').is_err());
    /// ```
    pub fn compile(path: &str, separator: char) -> Result<Self, CutError> {
        let mut steps = Vec::new();
        for segment in path.split(separator) {
            compile_segment(segment, path, &mut steps)?;
        }
        tracing::trace!(path, %separator, steps = steps.len(), "compiled path");
        Ok(Self {
            source: path.to_string(),
            steps,
        })
    }

    /// A single-step path addressing a sequence position, without brackets.
    pub fn index(index: usize) -> Self {
        Self {
            source: index.to_string(),
            steps: vec![Step::Index(index)],
        }
    }

    /// A single-step path addressing a mapping entry verbatim. Separators and
    /// brackets in `key` are not interpreted.
    pub fn key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            source: key.clone(),
            steps: vec![Step::Key(key)],
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The text this path was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The last step.
    pub fn terminal(&self) -> &Step {
        self.split_last().0
    }

    /// Split into the terminal step and the steps walked to reach its
    /// container.
    pub fn split_last(&self) -> (&Step, &[Step]) {
        match self.steps.split_last() {
            Some(split) => split,
            None => unreachable!("a compiled path holds at least one step"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn compile_segment(segment: &str, path: &str, steps: &mut Vec<Step>) -> Result<(), CutError> {
    let mut fragments = segment.split('[');
    // `split` always yields a first fragment, possibly empty.
    let key = fragments.next().unwrap_or_default();
    steps.push(Step::Key(key.to_string()));

    for fragment in fragments {
        let malformed = || CutError::MalformedPath {
            segment: segment.to_string(),
            path: path.to_string(),
        };
        let inner = fragment.strip_suffix(']').ok_or_else(malformed)?;
        if inner.is_empty() || inner.contains(']') {
            return Err(malformed());
        }
        let index = parse_index(inner).ok_or_else(|| CutError::NonIntegerIndex {
            fragment: inner.to_string(),
            path: path.to_string(),
        })?;
        steps.push(Step::Index(index));
    }
    Ok(())
}

/// Check if a string is a strict base-10 integer.
///
/// An optional single leading `-` followed by digits, with no zero padding,
/// no `-0`, no sign `+`, no exponent and no decimal point.
///
/// # Example
///
/// ```
/// use json_cut::is_strict_integer;
///
/// assert!(is_strict_integer("0"));
/// assert!(is_strict_integer("42"));
/// assert!(is_strict_integer("-7"));
/// assert!(!is_strict_integer("00"));
/// assert!(!is_strict_integer("-0"));
/// assert!(!is_strict_integer("1e1"));
/// assert!(!is_strict_integer("+1"));
/// ```
pub fn is_strict_integer(text: &str) -> bool {
    let negative = text.starts_with('-');
    let digits = if negative { &text[1..] } else { text };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    !(negative && digits == "0")
}

/// Parse bracket content into a sequence position.
///
/// Returns `None` for anything [`is_strict_integer`] rejects, for negative
/// integers, and for integers that overflow `usize`.
///
/// # Example
///
/// ```
/// use json_cut::parse_index;
///
/// assert_eq!(parse_index("12"), Some(12));
/// assert_eq!(parse_index("-1"), None);
/// assert_eq!(parse_index("012"), None);
/// ```
pub fn parse_index(text: &str) -> Option<usize> {
    if !is_strict_integer(text) || text.starts_with('-') {
        return None;
    }
    text.parse().ok()
}

/// Conversion into a compiled [`Path`].
///
/// Strings are compiled with the separator of the proxy they are used on.
/// Integers short-circuit to a single [`Step::Index`]. Already compiled paths
/// are used as-is, whatever separator they were compiled with.
pub trait IntoPath {
    fn into_path(self, separator: char) -> Result<Path, CutError>;
}

impl IntoPath for &str {
    fn into_path(self, separator: char) -> Result<Path, CutError> {
        Path::compile(self, separator)
    }
}

impl IntoPath for String {
    fn into_path(self, separator: char) -> Result<Path, CutError> {
        Path::compile(&self, separator)
    }
}

impl IntoPath for &String {
    fn into_path(self, separator: char) -> Result<Path, CutError> {
        Path::compile(self, separator)
    }
}

impl IntoPath for usize {
    fn into_path(self, _separator: char) -> Result<Path, CutError> {
        Ok(Path::index(self))
    }
}

impl IntoPath for Path {
    fn into_path(self, _separator: char) -> Result<Path, CutError> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self, _separator: char) -> Result<Path, CutError> {
        Ok(self.clone())
    }
}
