//! Raw query-string parameters.
//!
//! [`Params`] is an insertion-ordered multimap from parameter key to one or
//! more string values. It is the input of the parser and the output of the
//! serializer.

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// The reserved key of the grouping parameter.
pub const RESERVED_GROUP_KEY: &str = "and";

/// Insertion-ordered multimap of query-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Repeated keys keep every value in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid form encoding.
    pub fn from_query_string(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(pairs.into_iter().collect())
    }

    /// Encodes the parameters as a query string, repeating multi-valued keys.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }

    /// Returns the last value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value for `key`.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Sets `key` to a single value, replacing any existing values in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => *values = vec![value],
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Appends a value to `key`, creating it if missing.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Removes `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates keys with all their values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Iterates every `(key, value)` pair, repeating multi-valued keys.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for pair in self.pairs() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}
