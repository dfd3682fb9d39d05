// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Small data fixtures for multicast tests.

/// A person, the canonical non-trivial test payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

pub fn person_alice() -> Person {
    Person::new("Alice", 25)
}

pub fn person_bob() -> Person {
    Person::new("Bob", 30)
}

pub fn person_charlie() -> Person {
    Person::new("Charlie", 35)
}

pub fn person_diane() -> Person {
    Person::new("Diane", 40)
}
