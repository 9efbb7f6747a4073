//! In-memory storage implementation

use super::entry::Entry;
use super::person::Person;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::query::age::{AgeAbove, AgeBelow};
use crate::query::{And, Predicate};
use siphasher::sip::SipHasher13;
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

/// Type alias for our hash map with SipHasher
type StoreMap = HashMap<String, Entry, BuildHasherDefault<SipHasher13>>;

/// In-memory store of person records, keyed by name.
///
/// `save` is an upsert: at most one record exists per name, and saving
/// an existing name replaces the stored record entirely. Lookups and
/// scans hand out copies; the store owns its records exclusively.
///
/// Full scans return matches in insertion order, so repeated queries
/// against an unmodified store yield identical results.
pub struct PersonStore {
    /// The main storage map
    store: StoreMap,

    /// Store options (capacity, key casing, record cap)
    config: StoreConfig,

    /// Next insertion sequence to hand out
    next_seq: u64,
}

impl PersonStore {
    /// Create a new store with default configuration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a new store with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        PersonStore {
            store: HashMap::with_capacity_and_hasher(
                config.initial_capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
            config,
            next_seq: 0,
        }
    }

    /// Map key for a name, honoring the key-casing option
    fn key_for<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.config.case_insensitive_keys {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    /// Insert or replace the record stored under `person.name()`.
    ///
    /// Returns whether the name was new to the store. Replacing an
    /// existing record keeps its insertion sequence, so scan order is
    /// unaffected by overwrites.
    ///
    /// Errors:
    /// - `EmptyName` if the record's name is empty
    /// - `StoreFull` if a configured record cap would be exceeded by a
    ///   new name (overwrites are always admitted)
    pub fn save(&mut self, person: Person) -> Result<bool, StoreError> {
        if person.name().is_empty() {
            return Err(StoreError::EmptyName);
        }

        let key = self.key_for(person.name());
        let is_new = !self.store.contains_key(key.as_ref());

        if is_new && self.config.max_records > 0 && self.store.len() >= self.config.max_records {
            return Err(StoreError::StoreFull {
                current: self.store.len(),
                max: self.config.max_records,
            });
        }

        // A replaced record keeps the sequence it was first inserted with
        let seq = match self.store.get(key.as_ref()) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };

        self.store.insert(key.into_owned(), Entry::new(person, seq));

        Ok(is_new)
    }

    /// Exact lookup by name, returns a copy of the record if present
    pub fn find_by_name(&self, name: &str) -> Option<Person> {
        self.store
            .get(self.key_for(name).as_ref())
            .map(|entry| entry.person.clone())
    }

    /// Full scan returning copies of all records matching the
    /// predicate, in insertion order
    pub fn query(&self, predicate: &dyn Predicate) -> Vec<Person> {
        let mut matches: Vec<&Entry> = self
            .store
            .values()
            .filter(|entry| predicate.matches(&entry.person))
            .collect();

        matches.sort_by_key(|entry| entry.seq);
        matches.into_iter().map(|entry| entry.person.clone()).collect()
    }

    /// All records with `age > threshold` (strict)
    pub fn find_by_age_greater_than(&self, threshold: u32) -> Vec<Person> {
        self.query(&AgeAbove(threshold))
    }

    /// All records with `age < threshold` (strict)
    pub fn find_by_age_less_than(&self, threshold: u32) -> Vec<Person> {
        self.query(&AgeBelow(threshold))
    }

    /// All records with `low < age < high` (both bounds strict).
    ///
    /// `low >= high` admits no age and yields an empty result.
    pub fn find_by_age_greater_than_and_less_than(&self, low: u32, high: u32) -> Vec<Person> {
        self.query(&And(AgeAbove(low), AgeBelow(high)))
    }

    /// Delete a record by name, returning it if it existed
    pub fn remove(&mut self, name: &str) -> Option<Person> {
        self.store
            .remove(self.key_for(name).as_ref())
            .map(|entry| entry.person)
    }

    /// Remove all records
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Calculate approximate memory usage of stored data in bytes
    pub fn memory_usage(&self) -> usize {
        self.store
            .iter()
            .map(|(key, entry)| key.len() + entry.memory_usage())
            .sum()
    }

    /// Get statistics about the store
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            records: self.store.len(),
            used_memory_bytes: self.memory_usage(),
        }
    }
}

impl Default for PersonStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the store
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub records: usize,
    pub used_memory_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(people: &[Person]) -> Vec<&str> {
        people.iter().map(|p| p.name()).collect()
    }

    #[test]
    fn test_save_then_find_by_name() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();

        let found = store.find_by_name("Alice").unwrap();
        assert_eq!(found, Person::new("Alice", 40));
    }

    #[test]
    fn test_find_by_name_missing_key() {
        let store = PersonStore::new();
        assert_eq!(store.find_by_name("nobody"), None);
    }

    #[test]
    fn test_save_returns_is_new() {
        let mut store = PersonStore::new();
        assert!(store.save(Person::new("Alice", 40)).unwrap());
        assert!(!store.save(Person::new("Alice", 41)).unwrap());
    }

    #[test]
    fn test_save_overwrites_whole_record() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Alice", 41)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_name("Alice").unwrap().age(), 41);
    }

    #[test]
    fn test_save_empty_name_rejected() {
        let mut store = PersonStore::new();
        let result = store.save(Person::new("", 30));

        assert_eq!(result, Err(StoreError::EmptyName));
        assert!(store.is_empty());
    }

    #[test]
    fn test_age_greater_than_exact_set() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Bob", 18)).unwrap();
        store.save(Person::new("Carol", 19)).unwrap();

        // Strict comparison: 18 itself is excluded
        let adults = store.find_by_age_greater_than(18);
        assert_eq!(names(&adults), vec!["Alice", "Carol"]);
    }

    #[test]
    fn test_age_less_than_exact_set() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Bob", 5)).unwrap();
        store.save(Person::new("Carol", 4)).unwrap();

        let babies = store.find_by_age_less_than(5);
        assert_eq!(names(&babies), vec!["Carol"]);
    }

    #[test]
    fn test_age_range_is_intersection() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Bob", 12)).unwrap();
        store.save(Person::new("Carol", 13)).unwrap();
        store.save(Person::new("Dave", 20)).unwrap();

        let teens = store.find_by_age_greater_than_and_less_than(12, 20);
        assert_eq!(names(&teens), vec!["Carol"]);
    }

    #[test]
    fn test_age_range_empty_when_bounds_cross() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 15)).unwrap();

        assert!(store.find_by_age_greater_than_and_less_than(20, 12).is_empty());
        assert!(store.find_by_age_greater_than_and_less_than(15, 15).is_empty());
    }

    #[test]
    fn test_queries_on_empty_store() {
        let store = PersonStore::new();
        assert!(store.find_by_age_greater_than(0).is_empty());
        assert!(store.find_by_age_less_than(100).is_empty());
    }

    #[test]
    fn test_scan_in_insertion_order() {
        let mut store = PersonStore::new();
        store.save(Person::new("Zoe", 30)).unwrap();
        store.save(Person::new("Adam", 31)).unwrap();
        store.save(Person::new("Mia", 32)).unwrap();

        let all = store.find_by_age_greater_than(0);
        assert_eq!(names(&all), vec!["Zoe", "Adam", "Mia"]);
    }

    #[test]
    fn test_overwrite_keeps_scan_position() {
        let mut store = PersonStore::new();
        store.save(Person::new("Zoe", 30)).unwrap();
        store.save(Person::new("Adam", 31)).unwrap();
        store.save(Person::new("Zoe", 33)).unwrap();

        let all = store.find_by_age_greater_than(0);
        assert_eq!(names(&all), vec!["Zoe", "Adam"]);
        assert_eq!(all[0].age(), 33);
    }

    #[test]
    fn test_repeated_query_is_stable() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Bob", 25)).unwrap();
        store.save(Person::new("Carol", 35)).unwrap();

        let first = store.find_by_age_greater_than(20);
        let second = store.find_by_age_greater_than(20);
        assert_eq!(first, second);
    }

    #[test]
    fn test_demo_workload() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Baby Bob", 1)).unwrap();
        store.save(Person::new("Teen Carol", 13)).unwrap();

        assert_eq!(names(&store.find_by_age_greater_than(18)), vec!["Alice"]);
        assert_eq!(names(&store.find_by_age_less_than(5)), vec!["Baby Bob"]);
        assert_eq!(
            names(&store.find_by_age_greater_than_and_less_than(12, 20)),
            vec!["Teen Carol"]
        );
    }

    #[test]
    fn test_remove() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();

        assert_eq!(store.remove("Alice"), Some(Person::new("Alice", 40)));
        assert_eq!(store.remove("Alice"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_and_stats() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Bob", 25)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.records, 2);
        assert!(stats.used_memory_bytes > 0);

        store.clear();
        assert_eq!(store.stats().records, 0);
        assert_eq!(store.stats().used_memory_bytes, 0);
    }

    #[test]
    fn test_record_cap_rejects_new_keys() {
        let config = StoreConfig::default().with_max_records(2);
        let mut store = PersonStore::with_config(config);

        store.save(Person::new("Alice", 40)).unwrap();
        store.save(Person::new("Bob", 25)).unwrap();

        let result = store.save(Person::new("Carol", 35));
        assert_eq!(
            result,
            Err(StoreError::StoreFull { current: 2, max: 2 })
        );
        assert_eq!(store.len(), 2);

        // Overwrites are still admitted at the cap
        store.save(Person::new("Alice", 41)).unwrap();
        assert_eq!(store.find_by_name("Alice").unwrap().age(), 41);
    }

    #[test]
    fn test_case_insensitive_keys() {
        let config = StoreConfig::default().with_case_insensitive_keys(true);
        let mut store = PersonStore::with_config(config);

        store.save(Person::new("Alice", 40)).unwrap();
        assert_eq!(store.find_by_name("ALICE").unwrap().age(), 40);

        // Saving under another casing overwrites the same slot
        assert!(!store.save(Person::new("ALICE", 41)).unwrap());
        assert_eq!(store.len(), 1);

        // The stored record keeps the most recent spelling
        assert_eq!(store.find_by_name("alice").unwrap().name(), "ALICE");

        assert!(store.remove("aLiCe").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let mut store = PersonStore::new();
        store.save(Person::new("Alice", 40)).unwrap();

        assert_eq!(store.find_by_name("ALICE"), None);
        assert!(store.save(Person::new("ALICE", 41)).unwrap());
        assert_eq!(store.len(), 2);
    }
}
