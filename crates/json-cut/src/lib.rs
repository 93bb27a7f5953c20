//! Flattened path access into nested JSON values.
//!
//! A path such as `users[0].profile.name` addresses a value deep inside a
//! `serde_json::Value`: top-level segments are split on a separator (`.` by
//! default) and each segment may carry chained `[n]` sequence indices.
//!
//! The crate has two layers:
//!
//! - the path compiler ([`Path::compile`]) and the traversal engine
//!   ([`traverse`], [`locate`], [`set`], [`pop`], [`setdefault`], ...) that
//!   work on any `serde_json::Value`;
//! - the [`Cut`] proxy, which owns or borrows a tree plus a separator and
//!   exposes the same operations keyed by path strings.
//!
//! # Example
//!
//! ```
//! use json_cut::{Cut, CutError};
//! use serde_json::json;
//!
//! let mut cut = Cut::from(json!({"a": {"b": 42}, "list": [10, 20]}));
//!
//! assert_eq!(cut.get("a.b").unwrap(), &json!(42));
//! assert_eq!(cut.get_or("a.c", &json!("X")).unwrap(), &json!("X"));
//!
//! cut.set("list[1]", 99).unwrap();
//! assert_eq!(cut["list"], json!([10, 99]));
//!
//! // Sequences are never extended by assignment.
//! assert!(matches!(
//!     cut.set("list[5]", 1),
//!     Err(CutError::IndexOutOfRange { index: 5, len: 2, .. })
//! ));
//! ```

mod cut;
pub use cut::{Cut, Expand, ExpandMut, Keys};

mod error;
pub use error::CutError;

mod options;
pub use options::CutOptions;

pub mod path;
pub use path::{is_strict_integer, parse_index, IntoPath, Path, DEFAULT_SEPARATOR};

pub mod traverse;
pub use traverse::{
    contains, delete, find, get_or, locate, locate_mut, pop, pop_or, sequence_at,
    sequence_at_mut, set, setdefault, traverse, traverse_mut,
};

pub mod types;
pub use types::{Step, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_with_default() {
        let cut = Cut::from(json!({"a": {"b": 42}}));
        assert_eq!(cut.get("a.b").unwrap(), &json!(42));
        assert_eq!(cut.get_or("a.c", &json!("X")).unwrap(), &json!("X"));
    }

    #[test]
    fn test_set_sequence_element() {
        let mut cut = Cut::from(json!({"a": [10, 20]}));
        assert_eq!(cut.get("a[1]").unwrap(), &json!(20));
        cut.set("a[1]", 99).unwrap();
        assert_eq!(cut, json!({"a": [10, 99]}));
    }

    #[test]
    fn test_set_does_not_extend_sequence() {
        let mut cut = Cut::from(json!({"a": [10]}));
        let err = cut.set("a[5]", 1).unwrap_err();
        assert!(matches!(err, CutError::IndexOutOfRange { index: 5, .. }));
        assert_eq!(cut, json!({"a": [10]}));
    }

    #[test]
    fn test_setdefault_builds_skeleton() {
        let mut cut = Cut::new(None);
        assert_eq!(cut.setdefault("a.b.c", 7).unwrap(), &json!(7));
        assert_eq!(cut, json!({"a": {"b": {"c": 7}}}));
    }

    #[test]
    fn test_scalar_is_not_indexable() {
        let cut = Cut::from(json!({"a": 42}));
        let err = cut.get("a[0]").unwrap_err();
        assert_eq!(
            err,
            CutError::TypeMismatch {
                step: Step::Index(0),
                path: "a[0]".to_string(),
                found: ValueKind::Number,
            }
        );
    }

    #[test]
    fn test_expand_in_order() {
        let cut = Cut::from(json!({"users": [{"n": "a"}, {"n": "b"}]}));
        let users: Vec<_> = cut.expand("users").unwrap().collect();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0], json!({"n": "a"}));
        assert_eq!(users[1], json!({"n": "b"}));
    }

    #[test]
    fn test_compile_errors_are_never_defaulted() {
        let mut cut = Cut::from(json!({"a": [1]}));
        assert!(cut.get_or("a[-1]", &json!(0)).unwrap_err().is_compile_error());
        assert!(cut.pop_or("a[", 0).unwrap_err().is_compile_error());
        assert!(cut.contains("a[00]").unwrap_err().is_compile_error());
    }

    #[test]
    fn test_error_names_full_path() {
        let cut = Cut::from(json!({"users": [{"profile": {}}]}));
        let err = cut.get("users[0].profile.name").unwrap_err();
        assert_eq!(err.path(), "users[0].profile.name");
        assert!(err.to_string().contains("key 'name'"));
        assert!(err.to_string().contains("'users[0].profile.name'"));
    }
}
