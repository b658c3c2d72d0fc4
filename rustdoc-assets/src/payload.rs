//! Ordered name-to-records mappings
//!
//! Every data file rustdoc emits builds one of these: crate name to a list of
//! records. Names are unique and keep the order they were first seen in.

use rustc_hash::FxHashMap;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// One file's complete name-to-records mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<T> {
    entries: Vec<(String, Vec<T>)>,
    positions: FxHashMap<String, usize>,
}

impl<T> Default for Payload<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: FxHashMap::default(),
        }
    }
}

impl<T> Payload<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records under `name`
    ///
    /// A name that is already present keeps its position and has its records
    /// replaced, the same way a repeated key behaves in a JavaScript object.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<T>) -> Option<Vec<T>> {
        let name = name.into();
        if let Some(&position) = self.positions.get(&name) {
            Some(std::mem::replace(&mut self.entries[position].1, records))
        } else {
            self.positions.insert(name.clone(), self.entries.len());
            self.entries.push((name, records));
            None
        }
    }

    pub fn get(&self, name: &str) -> Option<&[T]> {
        self.positions
            .get(name)
            .map(|&position| &*self.entries[position].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| &**name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(name, records)| (&**name, &**records))
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records across all names
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }
}

impl<T, S: Into<String>> FromIterator<(S, Vec<T>)> for Payload<T> {
    fn from_iter<I: IntoIterator<Item = (S, Vec<T>)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (name, records) in iter {
            payload.insert(name, records);
        }
        payload
    }
}

impl<T> IntoIterator for Payload<T> {
    type Item = (String, Vec<T>);
    type IntoIter = std::vec::IntoIter<(String, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Accepts both spellings rustdoc has used: an object literal
/// (`{"name": [...]}`) and the array of pairs handed to `Object.fromEntries`
/// (`[["name", [...]]]`).
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Payload<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PayloadVisitor(PhantomData))
    }
}

struct PayloadVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for PayloadVisitor<T> {
    type Value = Payload<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object or an array of [name, records] pairs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut payload = Payload::new();
        while let Some((name, records)) = map.next_entry::<String, Vec<T>>()? {
            payload.insert(name, records);
        }
        Ok(payload)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut payload = Payload::new();
        while let Some((name, records)) = seq.next_element::<(String, Vec<T>)>()? {
            payload.insert(name, records);
        }
        Ok(payload)
    }
}
