//! Configuration accumulation and normalization
//!
//! During parsing every key maps to an ordered list of value strings; `=`
//! replaces the list and `+=` extends it. After the top-level parse the raw
//! [`ConfigMap`] is normalized into the externally visible [`Config`]:
//! empty keys are pruned and singleton lists collapse to scalars, except
//! for the fixed set of keys downstream consumers iterate positionally.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered values accumulated for one key
///
/// Almost every Doxyfile key carries a single value, so one element is
/// stored inline.
pub type ValueList = SmallVec<[String; 1]>;

/// Keys that stay lists even with a single element
///
/// Downstream consumers (source scanners, tag-file handling) iterate these
/// positionally and must not receive a bare scalar.
pub const ALWAYS_LIST_KEYS: [&str; 6] = [
    "LAYOUT_FILE",
    "INPUT",
    "FILE_PATTERNS",
    "EXCLUDE_PATTERNS",
    "@INCLUDE",
    "TAGFILES",
];

/// Returns true if `key` must remain a list after normalization
pub fn is_always_list(key: &str) -> bool {
    ALWAYS_LIST_KEYS.contains(&key)
}

/// Raw accumulation map mutated by the parser
///
/// Shared by reference across nested `@INCLUDE` parses; insertion order is
/// preserved and duplicates within a value list are kept.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap {
    items: IndexMap<String, ValueList>,
}

impl ConfigMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// `=` semantics: replaces any existing values for `key`
    pub fn assign(&mut self, key: impl Into<String>, values: ValueList) {
        self.items.insert(key.into(), values);
    }

    /// `+=` semantics: extends the existing values, creating the key if absent
    pub fn append(&mut self, key: impl Into<String>, values: ValueList) {
        self.items.entry(key.into()).or_default().extend(values);
    }

    /// Values currently accumulated for `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.items.get(key).map(|values| values.as_slice())
    }

    /// Number of keys in the map
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no keys have been accumulated
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates keys and their value lists in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.items
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Produces the externally visible configuration
    ///
    /// Keys with an empty value list are dropped. Singleton lists collapse
    /// to [`ConfigValue::Scalar`] unless the key is in [`ALWAYS_LIST_KEYS`].
    pub fn normalize(self) -> Config {
        self.items
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, mut values)| {
                let value = if values.len() == 1 && !is_always_list(&key) {
                    ConfigValue::Scalar(values.pop().unwrap_or_default())
                } else {
                    ConfigValue::List(values.into_vec())
                };
                (key, value)
            })
            .collect()
    }
}

impl From<Config> for ConfigMap {
    /// Re-opens a normalized configuration for further accumulation
    fn from(config: Config) -> Self {
        let items = config
            .into_iter()
            .map(|(key, value)| {
                let values = match value {
                    ConfigValue::Scalar(s) => ValueList::from_iter([s]),
                    ConfigValue::List(list) => ValueList::from_vec(list),
                };
                (key, values)
            })
            .collect();
        Self { items }
    }
}

/// A normalized configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Single value for a key that is not an always-list key
    Scalar(String),
    /// Ordered values, kept as a list
    List(Vec<String>),
}

impl ConfigValue {
    /// The scalar value, if this is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(s) => Some(s),
            ConfigValue::List(_) => None,
        }
    }

    /// The value list, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::Scalar(_) => None,
            ConfigValue::List(list) => Some(list),
        }
    }

    /// Iterates the contained values in order; a scalar yields one item
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            ConfigValue::Scalar(s) => std::slice::from_ref(s),
            ConfigValue::List(list) => list.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

impl PartialEq<&str> for ConfigValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_scalar() == Some(*other)
    }
}

/// The normalized configuration handed to external collaborators
pub type Config = IndexMap<String, ConfigValue>;
