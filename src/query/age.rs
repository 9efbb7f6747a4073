//! Age predicates

use super::Predicate;
use crate::store::Person;

/// Matches records with `age >` threshold (strict)
pub struct AgeAbove(pub u32);

impl Predicate for AgeAbove {
    fn matches(&self, person: &Person) -> bool {
        person.age() > self.0
    }

    fn name(&self) -> &'static str {
        "age_above"
    }
}

/// Matches records with `age <` threshold (strict)
pub struct AgeBelow(pub u32);

impl Predicate for AgeBelow {
    fn matches(&self, person: &Person) -> bool {
        person.age() < self.0
    }

    fn name(&self) -> &'static str {
        "age_below"
    }
}
