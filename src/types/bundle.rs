//! The result of decoding a whole archive.

use std::collections::HashMap;

use crate::types::array::DecodedArray;

/// A mapping from array name (entry path with the suffix stripped) to its
/// decoded contents. Built fresh by every decode call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveBundle {
    arrays: HashMap<String, DecodedArray>,
}

impl ArchiveBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, array: DecodedArray) {
        self.arrays.insert(name, array);
    }

    pub fn get(&self, name: &str) -> Option<&DecodedArray> {
        self.arrays.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Array names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.arrays.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DecodedArray)> {
        self.arrays.iter()
    }

    pub fn into_inner(self) -> HashMap<String, DecodedArray> {
        self.arrays
    }
}

impl IntoIterator for ArchiveBundle {
    type Item = (String, DecodedArray);
    type IntoIter = std::collections::hash_map::IntoIter<String, DecodedArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.into_iter()
    }
}
