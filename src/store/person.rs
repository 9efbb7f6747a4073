//! The stored record type

use serde::{Deserialize, Serialize};
use std::fmt;

/// A person record: a unique name and an age.
///
/// Records are immutable value objects. There is no way to mutate a
/// stored record in place; callers replace the whole record through
/// `PersonStore::save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    name: String,
    age: u32,
}

impl Person {
    /// Create a new person record
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Person {
            name: name.into(),
            age,
        }
    }

    /// The name (unique key within a store)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The age in years
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Approximate memory footprint of this record in bytes
    pub fn memory_usage(&self) -> usize {
        self.name.len() + std::mem::size_of::<u32>()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {} years old", self.name, self.age)
    }
}
