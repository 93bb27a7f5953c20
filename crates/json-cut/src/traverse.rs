//! Traversal engine.
//!
//! Walks a `serde_json::Value` following a compiled [`Path`]. Whole-path
//! lookups fold over every step; [`locate`] and [`locate_mut`] stop one step
//! short and hand back the parent container plus the terminal step, which is
//! what the slot operations (`set`, `delete`, `pop`, `setdefault`) act on.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CutError;
use crate::path::Path;
use crate::types::Step;

// ── Single step ───────────────────────────────────────────────────────────

fn child<'a>(value: &'a Value, step: &Step, path: &Path) -> Result<&'a Value, CutError> {
    match (value, step) {
        (Value::Object(map), Step::Key(key)) => {
            map.get(key).ok_or_else(|| CutError::key_not_found(key, path))
        }
        (Value::Array(items), Step::Index(index)) => items
            .get(*index)
            .ok_or_else(|| CutError::index_out_of_range(*index, items.len(), path)),
        (value, step) => Err(CutError::type_mismatch(step, path, value)),
    }
}

fn child_mut<'a>(
    value: &'a mut Value,
    step: &Step,
    path: &Path,
) -> Result<&'a mut Value, CutError> {
    match (value, step) {
        (Value::Object(map), Step::Key(key)) => {
            map.get_mut(key).ok_or_else(|| CutError::key_not_found(key, path))
        }
        (Value::Array(items), Step::Index(index)) => {
            let len = items.len();
            items
                .get_mut(*index)
                .ok_or_else(|| CutError::index_out_of_range(*index, len, path))
        }
        (value, step) => Err(CutError::type_mismatch(step, path, value)),
    }
}

/// Like [`child_mut`], but a missing mapping entry is created as an empty
/// mapping. Sequences are never extended.
fn child_or_insert<'a>(
    value: &'a mut Value,
    step: &Step,
    path: &Path,
) -> Result<&'a mut Value, CutError> {
    match (value, step) {
        (Value::Object(map), Step::Key(key)) => Ok(map.entry(key.as_str()).or_insert_with(|| {
            debug!(path = %path, key = key.as_str(), "created intermediate mapping");
            Value::Object(Map::new())
        })),
        (value, step) => child_mut(value, step, path),
    }
}

// ── Walking ───────────────────────────────────────────────────────────────

/// Follow every step of `path` from `root`.
///
/// # Errors
///
/// - [`CutError::KeyNotFound`] / [`CutError::IndexOutOfRange`] at the first
///   absent slot
/// - [`CutError::TypeMismatch`] when a step meets a scalar or the wrong kind
///   of container
///
/// # Example
///
/// ```
/// use json_cut::{traverse, Path};
/// use serde_json::json;
///
/// let doc = json!({"users": [{"name": "ash"}]});
/// let path = Path::compile("users[0].name", '.').unwrap();
/// assert_eq!(traverse(&doc, &path).unwrap(), &json!("ash"));
/// ```
pub fn traverse<'a>(root: &'a Value, path: &Path) -> Result<&'a Value, CutError> {
    path.steps()
        .iter()
        .try_fold(root, |value, step| child(value, step, path))
}

/// Mutable counterpart of [`traverse`].
pub fn traverse_mut<'a>(root: &'a mut Value, path: &Path) -> Result<&'a mut Value, CutError> {
    let mut current = root;
    for step in path.steps() {
        current = child_mut(current, step, path)?;
    }
    Ok(current)
}

/// Walk every step but the last, returning the container that holds the
/// terminal slot together with the terminal step.
///
/// The slot itself is not checked.
pub fn locate<'a, 'p>(root: &'a Value, path: &'p Path) -> Result<(&'a Value, &'p Step), CutError> {
    let (terminal, parents) = path.split_last();
    let parent = parents
        .iter()
        .try_fold(root, |value, step| child(value, step, path))?;
    Ok((parent, terminal))
}

/// Mutable counterpart of [`locate`].
pub fn locate_mut<'a, 'p>(
    root: &'a mut Value,
    path: &'p Path,
) -> Result<(&'a mut Value, &'p Step), CutError> {
    let (terminal, parents) = path.split_last();
    let mut current = root;
    for step in parents {
        current = child_mut(current, step, path)?;
    }
    Ok((current, terminal))
}

// ── Read operations ───────────────────────────────────────────────────────

/// Value at `path`, or `default` when the path is absent.
///
/// Only [`CutError::is_not_found`] errors are replaced by the default; type
/// mismatches still propagate.
pub fn get_or<'a>(root: &'a Value, path: &Path, default: &'a Value) -> Result<&'a Value, CutError> {
    match traverse(root, path) {
        Err(err) if err.is_not_found() => Ok(default),
        result => result,
    }
}

/// Value at `path`, or `None` when the path is absent.
pub fn find<'a>(root: &'a Value, path: &Path) -> Result<Option<&'a Value>, CutError> {
    match traverse(root, path) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Check if `path` resolves.
///
/// # Errors
///
/// Absence is `Ok(false)`; a type mismatch along the way is an error.
pub fn contains(root: &Value, path: &Path) -> Result<bool, CutError> {
    find(root, path).map(|found| found.is_some())
}

/// The sequence at `path`.
///
/// # Errors
///
/// Besides traversal errors, [`CutError::TypeMismatch`] naming the terminal
/// step if the value found is not a sequence.
pub fn sequence_at<'a>(root: &'a Value, path: &Path) -> Result<&'a [Value], CutError> {
    match traverse(root, path)? {
        Value::Array(items) => Ok(items),
        other => Err(CutError::type_mismatch(path.terminal(), path, other)),
    }
}

/// Mutable counterpart of [`sequence_at`].
pub fn sequence_at_mut<'a>(root: &'a mut Value, path: &Path) -> Result<&'a mut [Value], CutError> {
    match traverse_mut(root, path)? {
        Value::Array(items) => Ok(items),
        other => Err(CutError::type_mismatch(path.terminal(), path, other)),
    }
}

// ── Write operations ──────────────────────────────────────────────────────

/// Write `value` into the terminal slot, returning the value it replaced.
///
/// Missing intermediates are not created. A missing mapping key is inserted;
/// a sequence position must already exist.
///
/// # Example
///
/// ```
/// use json_cut::{set, Path};
/// use serde_json::json;
///
/// let mut doc = json!({"a": [10, 20]});
/// let old = set(&mut doc, &Path::compile("a[1]", '.').unwrap(), json!(99)).unwrap();
/// assert_eq!(old, Some(json!(20)));
/// assert_eq!(doc, json!({"a": [10, 99]}));
///
/// assert!(set(&mut doc, &Path::compile("a[5]", '.').unwrap(), json!(1)).is_err());
/// ```
pub fn set(root: &mut Value, path: &Path, value: Value) -> Result<Option<Value>, CutError> {
    let (parent, terminal) = locate_mut(root, path)?;
    debug!(path = %path, "set");
    match (parent, terminal) {
        (Value::Object(map), Step::Key(key)) => Ok(map.insert(key.clone(), value)),
        (Value::Array(items), Step::Index(index)) => {
            let len = items.len();
            let slot = items
                .get_mut(*index)
                .ok_or_else(|| CutError::index_out_of_range(*index, len, path))?;
            Ok(Some(std::mem::replace(slot, value)))
        }
        (parent, step) => Err(CutError::type_mismatch(step, path, parent)),
    }
}

/// Remove the terminal slot and return its value.
///
/// Mapping entries keep the order of the remaining keys; later sequence
/// elements shift down by one.
pub fn pop(root: &mut Value, path: &Path) -> Result<Value, CutError> {
    let (parent, terminal) = locate_mut(root, path)?;
    let removed = match (parent, terminal) {
        (Value::Object(map), Step::Key(key)) => map
            .shift_remove(key)
            .ok_or_else(|| CutError::key_not_found(key, path))?,
        (Value::Array(items), Step::Index(index)) => {
            if *index >= items.len() {
                return Err(CutError::index_out_of_range(*index, items.len(), path));
            }
            items.remove(*index)
        }
        (parent, step) => return Err(CutError::type_mismatch(step, path, parent)),
    };
    debug!(path = %path, "removed");
    Ok(removed)
}

/// Like [`pop`], returning `default` when the slot or one of its parents is
/// absent.
pub fn pop_or(root: &mut Value, path: &Path, default: Value) -> Result<Value, CutError> {
    match pop(root, path) {
        Err(err) if err.is_not_found() => Ok(default),
        result => result,
    }
}

/// Remove the terminal slot.
pub fn delete(root: &mut Value, path: &Path) -> Result<(), CutError> {
    pop(root, path).map(drop)
}

/// Return the value at `path`, inserting `default` first if the terminal key
/// is absent.
///
/// This is the one operation that writes while walking: missing intermediate
/// mapping levels are created as empty mappings. Sequence positions are never
/// created, so an absent index still fails with
/// [`CutError::IndexOutOfRange`].
///
/// # Example
///
/// ```
/// use json_cut::{setdefault, Path};
/// use serde_json::json;
///
/// let mut doc = json!({});
/// let path = Path::compile("a.b.c", '.').unwrap();
/// assert_eq!(setdefault(&mut doc, &path, json!(7)).unwrap(), &json!(7));
/// assert_eq!(doc, json!({"a": {"b": {"c": 7}}}));
/// ```
pub fn setdefault<'a>(
    root: &'a mut Value,
    path: &Path,
    default: Value,
) -> Result<&'a mut Value, CutError> {
    let (terminal, parents) = path.split_last();
    let mut current = root;
    for step in parents {
        current = child_or_insert(current, step, path)?;
    }
    match (current, terminal) {
        (Value::Object(map), Step::Key(key)) => Ok(map.entry(key.as_str()).or_insert_with(|| {
            debug!(path = %path, "inserted default");
            default
        })),
        (current, step) => child_mut(current, step, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueKind;
    use serde_json::json;

    fn p(path: &str) -> Path {
        Path::compile(path, '.').unwrap()
    }

    fn trainer() -> Value {
        json!({
            "trainer": {
                "name": "Ash",
                "badges": {"Boulder": true, "Cascade": false}
            },
            "pokemons": [
                {"name": "Bulbasaur", "type": ["Grass", "Poison"]},
                {"name": "Charmander", "type": "Fire"}
            ]
        })
    }

    #[test]
    fn test_traverse_nested() {
        let doc = trainer();
        assert_eq!(traverse(&doc, &p("trainer.name")).unwrap(), &json!("Ash"));
        assert_eq!(
            traverse(&doc, &p("pokemons[0].type[1]")).unwrap(),
            &json!("Poison")
        );
        assert_eq!(
            traverse(&doc, &p("trainer.badges")).unwrap(),
            &json!({"Boulder": true, "Cascade": false})
        );
    }

    #[test]
    fn test_traverse_key_not_found() {
        let doc = trainer();
        let err = traverse(&doc, &p("trainer.hometown.street")).unwrap_err();
        assert_eq!(
            err,
            CutError::KeyNotFound {
                key: "hometown".to_string(),
                path: "trainer.hometown.street".to_string(),
            }
        );
    }

    #[test]
    fn test_traverse_index_out_of_range() {
        let doc = trainer();
        let err = traverse(&doc, &p("pokemons[2].name")).unwrap_err();
        assert_eq!(
            err,
            CutError::IndexOutOfRange {
                index: 2,
                len: 2,
                path: "pokemons[2].name".to_string(),
            }
        );
    }

    #[test]
    fn test_traverse_type_mismatch() {
        let doc = trainer();

        let err = traverse(&doc, &p("trainer.name[0]")).unwrap_err();
        assert_eq!(
            err,
            CutError::TypeMismatch {
                step: Step::Index(0),
                path: "trainer.name[0]".to_string(),
                found: ValueKind::String,
            }
        );

        let err = traverse(&doc, &p("pokemons.name")).unwrap_err();
        assert!(matches!(
            err,
            CutError::TypeMismatch { found: ValueKind::Sequence, .. }
        ));

        let err = traverse(&doc, &p("trainer[0]")).unwrap_err();
        assert!(matches!(
            err,
            CutError::TypeMismatch { found: ValueKind::Mapping, .. }
        ));
    }

    #[test]
    fn test_traverse_index_on_root_sequence() {
        let doc = json!([1, 2, 3]);
        assert_eq!(traverse(&doc, &Path::index(2)).unwrap(), &json!(3));
    }

    #[test]
    fn test_traverse_empty_key() {
        let doc = json!({"": {"": 1}});
        assert_eq!(traverse(&doc, &p(".")).unwrap(), &json!(1));
        assert_eq!(traverse(&doc, &p("")).unwrap(), &json!({"": 1}));
    }

    #[test]
    fn test_locate() {
        let doc = trainer();
        let path = p("pokemons[1].name");
        let (parent, terminal) = locate(&doc, &path).unwrap();
        assert_eq!(parent, &json!({"name": "Charmander", "type": "Fire"}));
        assert_eq!(terminal, &Step::Key("name".to_string()));

        // The terminal slot is not checked.
        let path = p("trainer.missing");
        let (parent, _) = locate(&doc, &path).unwrap();
        assert!(parent.is_object());
    }

    #[test]
    fn test_locate_mut() {
        let mut doc = trainer();
        let path = p("trainer.badges.Boulder");
        let (parent, terminal) = locate_mut(&mut doc, &path).unwrap();
        assert_eq!(terminal, &Step::Key("Boulder".to_string()));
        parent["Earth"] = json!(true);
        assert_eq!(doc["trainer"]["badges"]["Earth"], json!(true));
    }

    #[test]
    fn test_get_or() {
        let doc = trainer();
        let default = json!("Pallet Town");
        assert_eq!(
            get_or(&doc, &p("trainer.hometown"), &default).unwrap(),
            &default
        );
        assert_eq!(get_or(&doc, &p("game.version"), &default).unwrap(), &default);
        assert_eq!(get_or(&doc, &p("pokemons[9]"), &default).unwrap(), &default);
        assert_eq!(
            get_or(&doc, &p("trainer.name"), &default).unwrap(),
            &json!("Ash")
        );
        // A default never masks a structural error.
        assert!(get_or(&doc, &p("trainer.name.first"), &default).is_err());
    }

    #[test]
    fn test_find_and_contains() {
        let doc = trainer();
        assert_eq!(find(&doc, &p("trainer.name")).unwrap(), Some(&json!("Ash")));
        assert_eq!(find(&doc, &p("trainer.age")).unwrap(), None);
        assert!(contains(&doc, &p("trainer.badges.Boulder")).unwrap());
        assert!(!contains(&doc, &p("trainer.badges.Thunder")).unwrap());
        assert!(!contains(&doc, &p("rival.name")).unwrap());
        assert!(!contains(&doc, &p("pokemons[5]")).unwrap());
        assert!(contains(&doc, &p("pokemons[0].type[1].x")).is_err());
    }

    #[test]
    fn test_contains_null_value() {
        let doc = json!({"sex": null});
        assert!(contains(&doc, &p("sex")).unwrap());
    }

    #[test]
    fn test_sequence_at() {
        let doc = trainer();
        assert_eq!(sequence_at(&doc, &p("pokemons")).unwrap().len(), 2);
        let err = sequence_at(&doc, &p("trainer")).unwrap_err();
        assert_eq!(
            err,
            CutError::TypeMismatch {
                step: Step::Key("trainer".to_string()),
                path: "trainer".to_string(),
                found: ValueKind::Mapping,
            }
        );

        let mut doc = doc;
        sequence_at_mut(&mut doc, &p("pokemons[0].type"))
            .unwrap()
            .reverse();
        assert_eq!(doc["pokemons"][0]["type"], json!(["Poison", "Grass"]));
    }

    #[test]
    fn test_set_overwrites_and_inserts() {
        let mut doc = trainer();
        let old = set(&mut doc, &p("trainer.badges.Boulder"), json!(false)).unwrap();
        assert_eq!(old, Some(json!(true)));
        let old = set(&mut doc, &p("trainer.friend"), json!("Brock")).unwrap();
        assert_eq!(old, None);
        assert_eq!(doc["trainer"]["badges"]["Boulder"], json!(false));
        assert_eq!(doc["trainer"]["friend"], json!("Brock"));
    }

    #[test]
    fn test_set_does_not_create_intermediates() {
        let mut doc = json!({});
        let err = set(&mut doc, &p("a.b"), json!(1)).unwrap_err();
        assert!(matches!(err, CutError::KeyNotFound { ref key, .. } if key == "a"));
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_set_index_out_of_range() {
        let mut doc = json!({"a": [10]});
        let err = set(&mut doc, &p("a[5]"), json!(1)).unwrap_err();
        assert_eq!(
            err,
            CutError::IndexOutOfRange {
                index: 5,
                len: 1,
                path: "a[5]".to_string(),
            }
        );
        // No append-by-assignment either.
        assert!(set(&mut doc, &p("a[1]"), json!(1)).is_err());
        assert_eq!(doc, json!({"a": [10]}));
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut doc = json!({"a": 42, "b": [1], "c": {}});
        assert!(matches!(
            set(&mut doc, &p("a.x"), json!(1)).unwrap_err(),
            CutError::TypeMismatch { found: ValueKind::Number, .. }
        ));
        assert!(matches!(
            set(&mut doc, &p("b.x"), json!(1)).unwrap_err(),
            CutError::TypeMismatch { found: ValueKind::Sequence, .. }
        ));
        assert!(matches!(
            set(&mut doc, &p("c[0]"), json!(1)).unwrap_err(),
            CutError::TypeMismatch { found: ValueKind::Mapping, .. }
        ));
    }

    #[test]
    fn test_pop_mapping_preserves_order() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        assert_eq!(pop(&mut doc, &p("a")).unwrap(), json!(1));
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_pop_sequence_shifts() {
        let mut doc = json!({"a": [1, 2, 3]});
        assert_eq!(pop(&mut doc, &p("a[0]")).unwrap(), json!(1));
        assert_eq!(doc, json!({"a": [2, 3]}));
        let err = pop(&mut doc, &p("a[2]")).unwrap_err();
        assert!(matches!(err, CutError::IndexOutOfRange { index: 2, len: 2, .. }));
    }

    #[test]
    fn test_pop_or() {
        let mut doc = trainer();
        assert_eq!(
            pop_or(&mut doc, &p("trainer.bicycle"), json!("Not Found")).unwrap(),
            json!("Not Found")
        );
        assert_eq!(
            pop_or(&mut doc, &p("rival.bicycle"), json!("Not Found")).unwrap(),
            json!("Not Found")
        );
        assert_eq!(
            pop_or(&mut doc, &p("trainer.badges.Cascade"), json!(null)).unwrap(),
            json!(false)
        );
        assert!(pop_or(&mut doc, &p("trainer.name.x"), json!(null)).is_err());
    }

    #[test]
    fn test_delete() {
        let mut doc = trainer();
        delete(&mut doc, &p("trainer.name")).unwrap();
        assert!(!contains(&doc, &p("trainer.name")).unwrap());
        assert!(contains(&doc, &p("trainer")).unwrap());
        let err = delete(&mut doc, &p("trainer.name")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_scalar_parent() {
        let mut doc = json!({"a": "text"});
        let err = delete(&mut doc, &p("a[0]")).unwrap_err();
        assert!(matches!(
            err,
            CutError::TypeMismatch { found: ValueKind::String, .. }
        ));
    }

    #[test]
    fn test_setdefault_existing() {
        let mut doc = trainer();
        let before = doc.clone();
        assert_eq!(
            setdefault(&mut doc, &p("trainer.badges.Boulder"), json!("Undefined")).unwrap(),
            &json!(true)
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_setdefault_creates_mappings() {
        let mut doc = json!({});
        assert_eq!(setdefault(&mut doc, &p("a.b.c"), json!(7)).unwrap(), &json!(7));
        assert_eq!(doc, json!({"a": {"b": {"c": 7}}}));
    }

    #[test]
    fn test_setdefault_never_extends_sequences() {
        let mut doc = json!({"a": [{"b": 1}]});
        let err = setdefault(&mut doc, &p("a[1].b"), json!(2)).unwrap_err();
        assert!(matches!(err, CutError::IndexOutOfRange { index: 1, len: 1, .. }));

        let err = setdefault(&mut doc, &p("a[3]"), json!(2)).unwrap_err();
        assert!(matches!(err, CutError::IndexOutOfRange { index: 3, .. }));

        // Existing positions are walked through normally.
        assert_eq!(setdefault(&mut doc, &p("a[0].c"), json!(3)).unwrap(), &json!(3));
        assert_eq!(doc, json!({"a": [{"b": 1, "c": 3}]}));
    }

    #[test]
    fn test_setdefault_type_mismatch() {
        let mut doc = json!({"a": 42});
        let err = setdefault(&mut doc, &p("a.b"), json!(1)).unwrap_err();
        assert!(matches!(
            err,
            CutError::TypeMismatch { found: ValueKind::Number, .. }
        ));
        let err = setdefault(&mut doc, &p("x[0]"), json!(1)).unwrap_err();
        assert!(matches!(
            err,
            CutError::TypeMismatch { found: ValueKind::Mapping, .. }
        ));
        // The intermediate created on the way stays behind.
        assert_eq!(doc, json!({"a": 42, "x": {}}));
    }
}
