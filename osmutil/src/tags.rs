use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// OSM tags. Keys are unique and iteration is always in key order, so anything derived from a
/// tag set is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn empty() -> Tags {
        Tags(BTreeMap::new())
    }

    pub fn get(&self, k: &str) -> Option<&String> {
        self.0.get(k)
    }

    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.contains_key(k))
    }

    pub fn is(&self, k: &str, v: &str) -> bool {
        self.0.get(k).map(|x| x == v).unwrap_or(false)
    }

    pub fn is_any(&self, k: &str, values: &[&str]) -> bool {
        if let Some(v) = self.0.get(k) {
            values.contains(&v.as_ref())
        } else {
            false
        }
    }

    /// The value of the first key in the chain that's present.
    pub fn first_of(&self, keys: &[&str]) -> Option<&String> {
        keys.iter().find_map(|k| self.0.get(*k))
    }

    /// Walks the chain of keys and returns the first value that `parse` accepts. Keys that are
    /// present but don't parse are skipped, exactly like missing keys.
    pub fn parse_first<T, F: Fn(&str) -> Option<T>>(&self, keys: &[&str], parse: F) -> Option<T> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find_map(|v| parse(v))
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, k: K, v: V) {
        self.0.insert(k.into(), v.into());
    }

    /// Returns true if the key was absent and got inserted.
    pub fn insert_if_absent<K: Into<String>, V: Into<String>>(&mut self, k: K, v: V) -> bool {
        let k = k.into();
        if self.0.contains_key(&k) {
            return false;
        }
        self.0.insert(k, v.into());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Only the tags whose key passes the filter.
    pub fn subset<F: Fn(&str) -> bool>(&self, keep: F) -> Tags {
        Tags(
            self.0
                .iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Tags {
        Tags(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn fallback_chain() {
        let t = tags(&[("building:height", "12"), ("height", "tall")]);
        assert_eq!(
            t.first_of(&["height", "building:height"]),
            Some(&"tall".to_string())
        );
        // "tall" doesn't parse, so the chain keeps going
        assert_eq!(
            t.parse_first(&["height", "building:height"], |x| x.parse::<f64>().ok()),
            Some(12.0)
        );
        assert_eq!(
            t.parse_first(&["min_height"], |x| x.parse::<f64>().ok()),
            None
        );
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut t = Tags::empty();
        assert!(t.insert_if_absent("height", "9"));
        assert!(!t.insert_if_absent("height", "20"));
        assert!(t.is("height", "9"));
    }

    #[test]
    fn lookups() {
        let t = tags(&[("type", "multipolygon"), ("building:part", "yes")]);
        assert!(t.is_any("type", &["multipolygon", "building"]));
        assert!(!t.is_any("type", &["route"]));
        assert!(t.has_any(&["building", "building:part"]));
        assert!(!t.has_any(&["building"]));
        assert_eq!(t.to_string(), "{building:part=yes, type=multipolygon}");

        let subset = t.subset(|k| k.starts_with("building"));
        assert_eq!(subset.len(), 1);
        assert!(subset.contains_key("building:part"));
    }
}
