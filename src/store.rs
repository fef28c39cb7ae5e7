//! # Property Store
//!
//! The host framework attaches an untyped, multi-valued property bag to every
//! test. This module defines the read-only interface the normalizer consumes
//! ([`PropertyStore`]), the opaque value type ([`PropertyValue`]), an
//! insertion-ordered in-memory implementation ([`PropertyBag`]) and a
//! declaration builder ([`Declarations`]) that stands in for the host's
//! annotation layer.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Category, CategoryDeclaration, Priority};

/// Keys the normalizer maps to typed fields. Anything else is a custom property.
pub mod keys {
    pub const DESCRIPTION: &str = "Description";
    pub const AUTHOR: &str = "Author";
    pub const OWNER: &str = "Owner";
    pub const PRIORITY: &str = "Priority";
    pub const TIMEOUT: &str = "Timeout";
    pub const CATEGORY: &str = "Category";
    pub const WORK_ITEM: &str = "WorkItem";
    pub const ISSUE_LINKS: &str = "IssueLinks";
}

/// An opaque value stored under a property key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PropertyValue {
    /// Integer view of the value. Numeric strings are accepted.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(n) => Some(*n),
            PropertyValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            PropertyValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(n) => write!(f, "{}", n),
            PropertyValue::Float(x) => write!(f, "{}", x),
            PropertyValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Str(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Int(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Int(n.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(x: f64) -> Self {
        PropertyValue::Float(x)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

/// Read-only view of a host framework's per-test property bag.
///
/// A key may be absent, present with no values, or present with several.
/// `keys` must be stable across calls: insertion order for [`PropertyBag`],
/// sorted for the map impls.
/// `get` returns an empty slice for absent keys.
pub trait PropertyStore {
    fn keys(&self) -> Vec<&str>;
    fn get(&self, key: &str) -> &[PropertyValue];

    fn contains_key(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    fn first(&self, key: &str) -> Option<&PropertyValue> {
        self.get(key).first()
    }
}

impl PropertyStore for BTreeMap<String, Vec<PropertyValue>> {
    fn keys(&self) -> Vec<&str> {
        BTreeMap::keys(self).map(String::as_str).collect()
    }

    fn get(&self, key: &str) -> &[PropertyValue] {
        BTreeMap::get(self, key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `HashMap` has no stable order, so its keys are reported sorted.
impl PropertyStore for HashMap<String, Vec<PropertyValue>> {
    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = HashMap::keys(self).map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn get(&self, key: &str) -> &[PropertyValue] {
        HashMap::get(self, key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One key of a [`PropertyBag`] with all of its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub key: String,
    #[serde(default)]
    pub values: Vec<PropertyValue>,
}

/// Insertion-ordered property bag. Keys keep the order they were first added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: Vec<PropertyEntry>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`, creating the key if needed.
    pub fn add(&mut self, key: &str, value: impl Into<PropertyValue>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.values.push(value),
            None => self.entries.push(PropertyEntry {
                key: key.to_string(),
                values: vec![value],
            }),
        }
        self
    }

    /// Registers `key` with no values (present but empty).
    pub fn add_key(&mut self, key: &str) -> &mut Self {
        if !self.entries.iter().any(|e| e.key == key) {
            self.entries.push(PropertyEntry {
                key: key.to_string(),
                values: Vec::new(),
            });
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PropertyEntry] {
        &self.entries
    }
}

impl PropertyStore for PropertyBag {
    fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    fn get(&self, key: &str) -> &[PropertyValue] {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.values.as_slice())
            .unwrap_or(&[])
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyBag {
    fn from_iter<T: IntoIterator<Item = (String, PropertyValue)>>(iter: T) -> Self {
        let mut bag = PropertyBag::new();
        for (key, value) in iter {
            bag.add(&key, value);
        }
        bag
    }
}

/// Builder that registers test metadata the way host annotations would.
///
/// ```
/// use verdict::store::{Declarations, PropertyStore};
/// use verdict::taxonomy::{Priority, TestArea, TestLevel, TestType};
///
/// let store = Declarations::new()
///     .author("qa-team")
///     .priority(Priority::High)
///     .categories(TestLevel::Integration, TestType::Smoke, TestArea::Web)
///     .issue_links(["jra-123"])
///     .build();
/// assert_eq!(store.get("Category").len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    bag: PropertyBag,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, text: &str) -> Self {
        self.bag.add(keys::DESCRIPTION, text);
        self
    }

    pub fn author(mut self, name: &str) -> Self {
        self.bag.add(keys::AUTHOR, name);
        self
    }

    pub fn owner(mut self, name: &str) -> Self {
        self.bag.add(keys::OWNER, name);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.bag.add(keys::PRIORITY, priority.ordinal());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        let ms = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self.bag.add(keys::TIMEOUT, ms);
        self
    }

    /// Registers one categorization declaration. `None` axes add nothing.
    pub fn categories(
        self,
        level: crate::taxonomy::TestLevel,
        test_type: crate::taxonomy::TestType,
        area: crate::taxonomy::TestArea,
    ) -> Self {
        self.declaration(CategoryDeclaration::new(level, test_type, area))
    }

    pub fn declaration(mut self, declaration: CategoryDeclaration) -> Self {
        for category in declaration.categories() {
            self.bag.add(keys::CATEGORY, category.as_str());
        }
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        if !category.is_unspecified() {
            self.bag.add(keys::CATEGORY, category.as_str());
        }
        self
    }

    pub fn issue_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for link in links {
            self.bag.add(keys::ISSUE_LINKS, link.as_ref());
        }
        self
    }

    pub fn work_item(mut self, item: impl Into<PropertyValue>) -> Self {
        self.bag.add(keys::WORK_ITEM, item);
        self
    }

    /// Registers an arbitrary key/value pair. Repeating a key appends.
    pub fn property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.bag.add(key, value);
        self
    }

    pub fn build(self) -> PropertyBag {
        self.bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{TestArea, TestLevel, TestType};

    #[test]
    fn test_bag_keeps_insertion_order_and_multiple_values() {
        let mut bag = PropertyBag::new();
        bag.add("Bug", "FOO-42").add("ID", "BAR-42").add("Bug", "FOO-43");
        assert_eq!(bag.keys(), vec!["Bug", "ID"]);
        assert_eq!(bag.get("Bug").len(), 2);
        assert!(bag.get("Missing").is_empty());
        assert!(!bag.contains_key("Missing"));
    }

    #[test]
    fn test_present_but_empty_key() {
        let mut bag = PropertyBag::new();
        bag.add_key("Category");
        assert!(bag.contains_key("Category"));
        assert!(bag.get("Category").is_empty());
        assert!(bag.first("Category").is_none());
    }

    #[test]
    fn test_declarations_skip_none_axes() {
        let bag = Declarations::new()
            .categories(TestLevel::Component, TestType::Functional, TestArea::None)
            .build();
        assert_eq!(
            bag.get(keys::CATEGORY),
            &[PropertyValue::from("Component"), PropertyValue::from("Functional")]
        );
    }

    #[test]
    fn test_declarations_timeout_in_millis() {
        let bag = Declarations::new().timeout(Duration::from_secs(60)).build();
        assert_eq!(bag.first(keys::TIMEOUT), Some(&PropertyValue::Int(60_000)));
    }

    #[test]
    fn test_value_display_and_int_view() {
        assert_eq!(PropertyValue::Int(123).to_string(), "123");
        assert_eq!(PropertyValue::from(" 42 ").as_int(), Some(42));
        assert_eq!(PropertyValue::Bool(true).as_int(), None);
        assert_eq!(PropertyValue::Float(2.0).as_int(), Some(2));
    }

    #[test]
    fn test_bag_deserializes_from_entry_list() {
        let yaml = "- key: WorkItem\n  values: [123, 456]\n- key: Bug\n  values: [FOO-42]\n";
        let bag: PropertyBag = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bag.keys(), vec!["WorkItem", "Bug"]);
        assert_eq!(bag.get("WorkItem")[1], PropertyValue::Int(456));
        assert_eq!(bag.get("Bug")[0], PropertyValue::from("FOO-42"));
    }

    #[test]
    fn test_btreemap_store() {
        let mut map = BTreeMap::new();
        map.insert("Owner".to_string(), vec![PropertyValue::from("me")]);
        assert_eq!(PropertyStore::keys(&map), vec!["Owner"]);
        assert_eq!(PropertyStore::get(&map, "Nope").len(), 0);
    }
}
