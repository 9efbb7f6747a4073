//! Entry structure for stored records

use super::person::Person;

/// A single entry in the store: the record plus its insertion sequence.
///
/// The sequence number orders full scans. Replacing a record keeps the
/// sequence it was first inserted with, so overwrites never reorder
/// scan results.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored record
    pub person: Person,

    /// Insertion sequence, assigned by the store on first insert
    pub seq: u64,
}

impl Entry {
    /// Create a new entry
    pub fn new(person: Person, seq: u64) -> Self {
        Entry { person, seq }
    }

    /// Approximate memory usage of this entry in bytes
    pub fn memory_usage(&self) -> usize {
        self.person.memory_usage() + std::mem::size_of::<u64>()
    }
}
