//! Name-keyed map that iterates in insertion order.
//!
//! Lookups go through a hash index, iteration walks a dense `Vec`. The
//! per-frame uniform loops only ever iterate, so they stay cache friendly.

use rustc_hash::FxHashMap;

/// Insertion-ordered map from `String` keys to values.
#[derive(Debug, Clone)]
pub struct ListMap<V> {
    entries: Vec<(String, V)>,
    index: FxHashMap<String, usize>,
}

impl<V> Default for ListMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ListMap<V> {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Value under `key`, inserting `make()` at the end first if absent.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        make: impl FnOnce() -> V,
    ) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push((key.to_owned(), make()));
                let _ = self.index.insert(key.to_owned(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for (name, _) in &self.entries[i..] {
            if let Some(slot) = self.index.get_mut(name) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Mutable values in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_across_removal() {
        let mut map = ListMap::new();
        for (i, key) in ["c", "a", "d", "b"].into_iter().enumerate() {
            let _ = map.get_or_insert_with(key, || i);
        }
        assert_eq!(map.remove("a"), Some(1));
        assert_eq!(map.remove("a"), None);

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["c", "d", "b"]);
        assert_eq!(map.get("b"), Some(&3));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn get_or_insert_does_not_overwrite() {
        let mut map = ListMap::new();
        *map.get_or_insert_with("x", || 1) += 10;
        let _ = map.get_or_insert_with("x", || 99);
        assert_eq!(map.get("x"), Some(&11));
    }
}
