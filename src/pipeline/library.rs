// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The shared library of discovered ships.
//!
//! Entries are keyed by the RLE text of the canonical form, so the same
//! ship found from many different seeds collapses to one entry. When hit
//! counting is on, rediscoveries bump the entry's counter; exhaustive
//! enumerations turn counting off because every orbit is visited a known
//! number of times and the counter would only add noise to the dump.

use crate::geometry::Cell;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

/// One discovered ship, as written to the JSON dump.
#[derive(Clone, Serialize)]
pub struct LibraryEntry {
    pub rle: String,
    pub period: i32,
    pub offset: Cell,
    pub population: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<u64>,
}

/// Deduplicating, internally synchronized collection of ships.
pub struct Library {
    entries: Mutex<HashMap<String, LibraryEntry>>,
    store_hit_count: bool,
}

impl Library {
    pub fn new() -> Self {
        Library::with_hit_count(true)
    }

    pub fn with_hit_count(store_hit_count: bool) -> Self {
        Library {
            entries: Mutex::new(HashMap::new()),
            store_hit_count,
        }
    }

    /// Record a discovery. `rle` must be the canonical form's encoding.
    pub fn put(&self, rle: String, period: i32, offset: Cell, population: usize) {
        let mut entries = self.entries.lock().expect("library lock poisoned");
        match entries.get_mut(&rle) {
            Some(entry) => {
                if let Some(hits) = entry.hits.as_mut() {
                    *hits += 1;
                }
            }
            None => {
                let hits = self.store_hit_count.then_some(1);
                entries.insert(
                    rle.clone(),
                    LibraryEntry {
                        rle,
                        period,
                        offset,
                        population,
                        hits,
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("library lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the whole library as pretty-printed JSON, ordered by period
    /// then canonical form.
    pub fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        let mut entries: Vec<LibraryEntry> = {
            let guard = self.entries.lock().expect("library lock poisoned");
            guard.values().cloned().collect()
        };
        entries.sort_by(|a, b| (a.period, &a.rle).cmp(&(b.period, &b.rle)));
        serde_json::to_writer_pretty(&mut *out, &entries)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        out.write_all(b"\n")
    }
}

impl Default for Library {
    fn default() -> Self {
        Library::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_deduplicates_and_counts() {
        let library = Library::new();
        library.put("2bo$obo$o!".into(), 48, Cell(2, 2), 4);
        library.put("2bo$obo$o!".into(), 48, Cell(2, 2), 4);
        library.put("o$o2$o$o!".into(), 368, Cell(2, 2), 4);
        assert_eq!(library.len(), 2);

        let mut buffer = Vec::new();
        library.dump(&mut buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let list = parsed.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["period"], 48);
        assert_eq!(list[0]["hits"], 2);
        assert_eq!(list[1]["period"], 368);
        assert_eq!(list[1]["hits"], 1);
    }

    #[test]
    fn test_hit_count_can_be_disabled() {
        let library = Library::with_hit_count(false);
        library.put("2bo$obo$o!".into(), 48, Cell(2, 2), 4);
        library.put("2bo$obo$o!".into(), 48, Cell(2, 2), 4);

        let mut buffer = Vec::new();
        library.dump(&mut buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(parsed[0].get("hits").is_none());
    }
}
