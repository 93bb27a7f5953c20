//! The `Cut` proxy: path-addressed access to a wrapped tree.

use std::borrow::{Borrow, BorrowMut};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CutError;
use crate::options::CutOptions;
use crate::path::{IntoPath, Path, DEFAULT_SEPARATOR};
use crate::traverse;

/// A proxy over a nested `serde_json::Value` addressed with flattened paths.
///
/// `D` is the storage: an owned [`Value`] by default, or a borrowed
/// `&Value` / `&mut Value` for the per-element proxies produced by
/// [`Cut::expand`] and [`Cut::expand_mut`]. Read operations need
/// `D: Borrow<Value>`, mutating ones `D: BorrowMut<Value>`.
///
/// # Example
///
/// ```
/// use json_cut::Cut;
/// use serde_json::json;
///
/// let mut cut = Cut::from(json!({"trainer": {"name": "Ash"}, "pokemons": [{"level": 5}]}));
/// assert_eq!(cut.get("trainer.name").unwrap(), &json!("Ash"));
///
/// cut.set("pokemons[0].level", 666).unwrap();
/// assert_eq!(cut["pokemons[0].level"], json!(666));
///
/// cut.setdefault("trainer.badges.Boulder", true).unwrap();
/// assert!(cut.contains("trainer.badges.Boulder").unwrap());
/// ```
#[derive(Clone)]
pub struct Cut<D = Value> {
    data: D,
    separator: char,
}

impl Cut {
    /// Wrap a mapping, or an empty one when `data` is `None`.
    pub fn new(data: Option<Map<String, Value>>) -> Self {
        Self::with_options(data, CutOptions::default())
    }

    pub fn with_separator(data: Option<Map<String, Value>>, separator: char) -> Self {
        Self::with_options(data, CutOptions::with_separator(separator))
    }

    pub fn with_options(data: Option<Map<String, Value>>, options: CutOptions) -> Self {
        Self {
            data: Value::Object(data.unwrap_or_default()),
            separator: options.separator,
        }
    }

    /// A proxy whose top-level keys all map to `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use json_cut::Cut;
    /// use serde_json::{json, Value};
    ///
    /// let cut = Cut::from_keys(["Catz", "Dogz"], Value::Null);
    /// assert_eq!(cut, json!({"Catz": null, "Dogz": null}));
    /// ```
    pub fn from_keys<I, K>(keys: I, value: Value) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let map = keys
            .into_iter()
            .map(|key| (key.into(), value.clone()))
            .collect();
        Self::new(Some(map))
    }

    /// Unwrap the tree.
    pub fn into_inner(self) -> Value {
        self.data
    }
}

impl Default for Cut {
    fn default() -> Self {
        Self::new(None)
    }
}

impl From<Map<String, Value>> for Cut {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(Some(map))
    }
}

/// Wraps any value as-is; only a top-level mapping supports the delegated
/// mapping methods.
impl From<Value> for Cut {
    fn from(value: Value) -> Self {
        Self::from_value(value, DEFAULT_SEPARATOR)
    }
}

impl<D> Cut<D> {
    /// Wrap arbitrary storage without checking its shape.
    pub fn from_value(data: D, separator: char) -> Self {
        Self { data, separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    fn compile(&self, path: impl IntoPath) -> Result<Path, CutError> {
        path.into_path(self.separator)
    }
}

impl<'a> Cut<&'a Value> {
    /// Wrap each element of `items`, the way [`Cut::expand`] does for a
    /// sequence found inside a tree.
    pub fn wrap_all(items: &'a [Value], separator: char) -> Expand<'a> {
        Expand {
            items: items.iter(),
            separator,
        }
    }
}

// ── Path-addressed reads ──────────────────────────────────────────────────

impl<D: Borrow<Value>> Cut<D> {
    /// The wrapped tree.
    pub fn data(&self) -> &Value {
        self.data.borrow()
    }

    /// Value at `path`.
    ///
    /// # Errors
    ///
    /// Compile errors, and every traversal error including absence.
    pub fn get(&self, path: impl IntoPath) -> Result<&Value, CutError> {
        let path = self.compile(path)?;
        traverse::traverse(self.data(), &path)
    }

    /// Value at `path`, or `default` if it is absent.
    ///
    /// # Errors
    ///
    /// Compile errors and type mismatches are never replaced by the default.
    pub fn get_or<'a>(
        &'a self,
        path: impl IntoPath,
        default: &'a Value,
    ) -> Result<&'a Value, CutError> {
        let path = self.compile(path)?;
        traverse::get_or(self.data(), &path, default)
    }

    /// Value at `path`, or `None` if it is absent.
    pub fn find(&self, path: impl IntoPath) -> Result<Option<&Value>, CutError> {
        let path = self.compile(path)?;
        traverse::find(self.data(), &path)
    }

    /// Check if `path` resolves.
    pub fn contains(&self, path: impl IntoPath) -> Result<bool, CutError> {
        let path = self.compile(path)?;
        traverse::contains(self.data(), &path)
    }

    /// Wrap each element of the sequence at `path` in a new proxy carrying
    /// this proxy's separator.
    ///
    /// The iterator is lazy; every call starts over from the first element.
    ///
    /// # Example
    ///
    /// ```
    /// use json_cut::Cut;
    /// use serde_json::json;
    ///
    /// let cut = Cut::from(json!({"users": [{"n": "a"}, {"n": "b"}]}));
    /// let names: Vec<_> = cut
    ///     .expand("users")
    ///     .unwrap()
    ///     .map(|user| user.get("n").unwrap().clone())
    ///     .collect();
    /// assert_eq!(names, vec![json!("a"), json!("b")]);
    /// ```
    pub fn expand(&self, path: impl IntoPath) -> Result<Expand<'_>, CutError> {
        let path = self.compile(path)?;
        let items = traverse::sequence_at(self.data(), &path)?;
        Ok(Expand {
            items: items.iter(),
            separator: self.separator,
        })
    }

    /// Alias of [`Cut::expand`].
    pub fn all(&self, path: impl IntoPath) -> Result<Expand<'_>, CutError> {
        self.expand(path)
    }

    /// Top-level keys. Empty unless the tree is a mapping.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.data().as_object().map(Map::keys),
        }
    }

    /// Alias of [`Cut::keys`].
    pub fn iter(&self) -> Keys<'_> {
        self.keys()
    }

    /// Top-level values. Empty unless the tree is a mapping.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.data().as_object().into_iter().flat_map(Map::values)
    }

    /// Top-level entries. Empty unless the tree is a mapping.
    pub fn items(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.data().as_object().into_iter().flat_map(Map::iter)
    }

    /// Number of top-level entries; zero for a scalar.
    pub fn len(&self) -> usize {
        match self.data() {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the wrapped tree.
    pub fn copy(&self) -> Value {
        self.data().clone()
    }
}

// ── Path-addressed writes ─────────────────────────────────────────────────

impl<D: BorrowMut<Value>> Cut<D> {
    fn data_mut(&mut self) -> &mut Value {
        self.data.borrow_mut()
    }

    /// Mutable reference to the value at `path`.
    pub fn get_mut(&mut self, path: impl IntoPath) -> Result<&mut Value, CutError> {
        let path = self.compile(path)?;
        traverse::traverse_mut(self.data_mut(), &path)
    }

    /// Write `value` at `path`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Missing intermediates are not created and sequences are not extended.
    pub fn set(
        &mut self,
        path: impl IntoPath,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, CutError> {
        let path = self.compile(path)?;
        traverse::set(self.data_mut(), &path, value.into())
    }

    /// Remove the slot at `path`.
    pub fn delete(&mut self, path: impl IntoPath) -> Result<(), CutError> {
        let path = self.compile(path)?;
        traverse::delete(self.data_mut(), &path)
    }

    /// Remove the slot at `path` and return its value.
    pub fn pop(&mut self, path: impl IntoPath) -> Result<Value, CutError> {
        let path = self.compile(path)?;
        traverse::pop(self.data_mut(), &path)
    }

    /// Like [`Cut::pop`], returning `default` when the slot is absent.
    pub fn pop_or(
        &mut self,
        path: impl IntoPath,
        default: impl Into<Value>,
    ) -> Result<Value, CutError> {
        let path = self.compile(path)?;
        traverse::pop_or(self.data_mut(), &path, default.into())
    }

    /// Value at `path`, inserting `default` first if absent.
    ///
    /// Missing intermediate mappings are created on the way.
    pub fn setdefault(
        &mut self,
        path: impl IntoPath,
        default: impl Into<Value>,
    ) -> Result<&mut Value, CutError> {
        let path = self.compile(path)?;
        traverse::setdefault(self.data_mut(), &path, default.into())
    }

    /// Apply [`Cut::set`] for each `(path, value)` pair, in order.
    ///
    /// A `serde_json::Map` of path strings to values works as well as a list
    /// of pairs. Stops at the first failing pair; earlier writes stay.
    ///
    /// # Example
    ///
    /// ```
    /// use json_cut::Cut;
    /// use serde_json::json;
    ///
    /// let mut cut = Cut::from(json!({"trainer": {}}));
    /// cut.update([("trainer.friend", json!("Brock")), ("game", json!("Blue"))]).unwrap();
    /// assert_eq!(cut, json!({"trainer": {"friend": "Brock"}, "game": "Blue"}));
    /// ```
    pub fn update<I, P, V>(&mut self, pairs: I) -> Result<(), CutError>
    where
        I: IntoIterator<Item = (P, V)>,
        P: IntoPath,
        V: Into<Value>,
    {
        for (path, value) in pairs {
            self.set(path, value)?;
        }
        Ok(())
    }

    /// [`Cut::update`] followed by flat top-level assignments.
    ///
    /// Keys in `extra` are used verbatim as top-level mapping keys; they are
    /// not compiled as paths.
    pub fn update_with<I, P, V, E, K, W>(&mut self, pairs: I, extra: E) -> Result<(), CutError>
    where
        I: IntoIterator<Item = (P, V)>,
        P: IntoPath,
        V: Into<Value>,
        E: IntoIterator<Item = (K, W)>,
        K: Into<String>,
        W: Into<Value>,
    {
        self.update(pairs)?;
        self.update(extra.into_iter().map(|(key, value)| (Path::key(key), value)))
    }

    /// Like [`Cut::expand`], but each proxy borrows its element mutably so
    /// writes land in this tree.
    pub fn expand_mut(&mut self, path: impl IntoPath) -> Result<ExpandMut<'_>, CutError> {
        let path = self.compile(path)?;
        let separator = self.separator;
        let items = traverse::sequence_at_mut(self.data_mut(), &path)?;
        Ok(ExpandMut {
            items: items.iter_mut(),
            separator,
        })
    }

    /// Remove every top-level entry.
    pub fn clear(&mut self) {
        match self.data_mut() {
            Value::Object(map) => map.clear(),
            Value::Array(items) => items.clear(),
            _ => {}
        }
    }

    /// Remove and return the last inserted top-level entry.
    pub fn popitem(&mut self) -> Option<(String, Value)> {
        let map = self.data_mut().as_object_mut()?;
        let key = map.keys().next_back()?.clone();
        let value = map.shift_remove(&key)?;
        debug!(key = key.as_str(), "popped item");
        Some((key, value))
    }
}

// ── Trait impls ───────────────────────────────────────────────────────────

/// # Panics
///
/// Panics if the path does not compile or does not resolve, like indexing a
/// `HashMap` with a missing key. Use [`Cut::get`] to handle failures.
impl<D, P> Index<P> for Cut<D>
where
    D: Borrow<Value>,
    P: IntoPath,
{
    type Output = Value;

    fn index(&self, path: P) -> &Value {
        match self.get(path) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<D: Borrow<Value>, E: Borrow<Value>> PartialEq<Cut<E>> for Cut<D> {
    fn eq(&self, other: &Cut<E>) -> bool {
        self.data() == other.data()
    }
}

impl<D: Borrow<Value>> Eq for Cut<D> {}

impl<D: Borrow<Value>> PartialEq<Value> for Cut<D> {
    fn eq(&self, other: &Value) -> bool {
        self.data() == other
    }
}

impl<D: Borrow<Value>> PartialEq<Map<String, Value>> for Cut<D> {
    fn eq(&self, other: &Map<String, Value>) -> bool {
        matches!(self.data(), Value::Object(map) if map == other)
    }
}

impl<D: Borrow<Value>> fmt::Display for Cut<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.data(), f)
    }
}

impl<D: Borrow<Value>> fmt::Debug for Cut<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cut: {}", self.data())
    }
}

impl<'a, D: Borrow<Value>> IntoIterator for &'a Cut<D> {
    type Item = &'a String;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Keys<'a> {
        self.keys()
    }
}

// ── Iterators ─────────────────────────────────────────────────────────────

/// Iterator over the top-level keys of a [`Cut`].
pub struct Keys<'a> {
    inner: Option<serde_json::map::Keys<'a>>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.as_ref().map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl FusedIterator for Keys<'_> {}

/// Read-only proxies over the elements of a sequence.
///
/// A clone continues from the same position; call [`Cut::expand`] again to
/// start over.
#[derive(Clone)]
pub struct Expand<'a> {
    items: std::slice::Iter<'a, Value>,
    separator: char,
}

impl<'a> Iterator for Expand<'a> {
    type Item = Cut<&'a Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let separator = self.separator;
        self.items.next().map(|item| Cut::from_value(item, separator))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl DoubleEndedIterator for Expand<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let separator = self.separator;
        self.items.next_back().map(|item| Cut::from_value(item, separator))
    }
}

impl ExactSizeIterator for Expand<'_> {}

impl FusedIterator for Expand<'_> {}

/// Mutable proxies over the elements of a sequence.
pub struct ExpandMut<'a> {
    items: std::slice::IterMut<'a, Value>,
    separator: char,
}

impl<'a> Iterator for ExpandMut<'a> {
    type Item = Cut<&'a mut Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let separator = self.separator;
        self.items.next().map(|item| Cut::from_value(item, separator))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl DoubleEndedIterator for ExpandMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let separator = self.separator;
        self.items.next_back().map(|item| Cut::from_value(item, separator))
    }
}

impl ExactSizeIterator for ExpandMut<'_> {}

impl FusedIterator for ExpandMut<'_> {}
