//! Insertion-ordered map.
//!
//! Several entities in the document (participants, matches, standings,
//! team assignments) are logically maps but must serialize and iterate in
//! insertion order for replicas to converge on identical wire output (see
//! `serialize()` in the spec). `HashMap` does not guarantee this, so we pair
//! it with a `Vec` of keys recording insertion order, rather than pull in an
//! external ordered-map crate the example corpus does not otherwise use.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "K: Eq + Hash + Clone + Serialize + for<'de2> Deserialize<'de2>, V: Serialize + for<'de2> Deserialize<'de2>")]
pub struct OrderedMap<K, V> {
    order: Vec<K>,
    map: HashMap<K, V>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, appending the key to insertion order only if it is
    /// new. Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if !self.map.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.map.insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.map.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(move |k| self.map.get(k))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        // order of mutation doesn't need to match insertion order semantics,
        // but we still only touch keys that are present.
        self.map.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().filter_map(move |k| self.map.get(k).map(|v| (k, v)))
    }

    /// Entry point used when replaying a snapshot: replaces the whole map
    /// while keeping the snapshot's own ordering.
    pub fn from_ordered_pairs(pairs: Vec<(K, V)>) -> Self {
        let mut out = Self::new();
        for (k, v) in pairs {
            out.insert(k, v);
        }
        out
    }

    /// Returns the contents as ordered `(key, value)` pairs, the shape used
    /// by `serialize()`.
    pub fn to_ordered_pairs(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order_across_reinsertion() {
        let mut m: OrderedMap<String, i32> = OrderedMap::new();
        m.insert("b".into(), 2);
        m.insert("a".into(), 1);
        m.insert("b".into(), 20);
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(m.get(&"b".to_string()), Some(&20));
    }

    #[test]
    fn remove_drops_from_order() {
        let mut m: OrderedMap<&str, i32> = OrderedMap::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.remove(&"a");
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec!["b"]);
    }

    #[test]
    fn round_trips_through_ordered_pairs() {
        let mut m: OrderedMap<String, i32> = OrderedMap::new();
        m.insert("x".into(), 1);
        m.insert("y".into(), 2);
        let pairs = m.to_ordered_pairs();
        let rebuilt = OrderedMap::from_ordered_pairs(pairs);
        assert_eq!(rebuilt.keys().cloned().collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
