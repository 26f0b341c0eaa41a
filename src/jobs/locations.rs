// src/jobs/locations.rs
use crate::config::LocationIds;
use crate::utils::normalize_location;
use std::collections::HashMap;

/// Location name to LinkedIn geo/populated-place ids, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    entries: HashMap<String, LocationIds>,
}

impl LocationTable {
    pub fn new(entries: &HashMap<String, LocationIds>) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, ids)| (normalize_location(name), ids.clone()))
                .collect(),
        }
    }

    pub fn lookup(&self, location: &str) -> Option<&LocationIds> {
        self.entries.get(&normalize_location(location))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
