// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one submitted search for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchId(u64);

impl SearchId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SearchId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing ids starting at 1.
#[derive(Debug, Clone, Default)]
pub struct SearchIdCounter {
    last: u64,
}

impl SearchIdCounter {
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    pub fn next_id(&mut self) -> SearchId {
        self.last = self.last.saturating_add(1);
        SearchId(self.last)
    }

    pub const fn last_issued(&self) -> Option<SearchId> {
        if self.last == 0 {
            None
        } else {
            Some(SearchId(self.last))
        }
    }
}
