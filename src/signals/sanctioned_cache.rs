//! Layer 6 — sanctioned-identifier fast path (spec §4.2).
//!
//! A read-mostly lookup of known-sanctioned identifier values, hot-swappable
//! behind `RwLock<Arc<HashMap<..>>>` — the same shape `gate`'s policy engine
//! uses for its sanctions list snapshot, swapped wholesale on reload rather
//! than mutated key-by-key so readers never observe a half-updated table.
//!
//! The fast path fires regardless of the candidate's own checksum `valid`
//! flag: a sanctioned list entry for a malformed-but-matching INN is still
//! a hit (§4.2 "sanctioned status is checked on the raw value, independent
//! of validation").

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;

use crate::types::Id;

/// Spec §6 sanctioned-ID snapshot schema: each entry identifies whether the
/// listed subject is a natural person or a legal entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Organization,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SanctionRecord {
    pub name: String,
    pub source: String,
    pub entity_type: EntityType,
}

pub struct SanctionedIdCache {
    table: RwLock<Arc<HashMap<String, SanctionRecord>>>,
}

impl SanctionedIdCache {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    pub fn from_map(entries: HashMap<String, SanctionRecord>) -> Self {
        Self {
            table: RwLock::new(Arc::new(entries)),
        }
    }

    /// Atomically replace the whole table; in-flight lookups keep using
    /// their snapshot `Arc` until they finish.
    pub fn reload(&self, entries: HashMap<String, SanctionRecord>) {
        *self.table.write() = Arc::new(entries);
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Stamp every matching identifier's `sanctioned`/`sanctioned_name`/
    /// `sanctioned_source` fields in place, independent of `valid`.
    pub fn annotate(&self, ids: &mut [Id]) {
        let snapshot = self.table.read().clone();
        if snapshot.is_empty() {
            return;
        }
        for id in ids.iter_mut() {
            if let Some(record) = snapshot.get(&id.value) {
                id.sanctioned = true;
                id.sanctioned_name = Some(record.name.clone());
                id.sanctioned_source = Some(record.source.clone());
            }
        }
    }
}

impl Default for SanctionedIdCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IdKind;

    fn make_id(value: &str, valid: bool) -> Id {
        Id {
            kind: IdKind::Inn,
            value: value.to_string(),
            raw: value.to_string(),
            confidence: 0.7,
            valid,
            sanctioned: false,
            sanctioned_name: None,
            sanctioned_source: None,
            position: None,
        }
    }

    #[test]
    fn fast_path_fires_even_for_checksum_invalid_candidate() {
        let mut entries = HashMap::new();
        entries.insert(
            "1234567890".to_string(),
            SanctionRecord {
                name: "Listed Entity".to_string(),
                source: "ofac".to_string(),
                entity_type: EntityType::Organization,
            },
        );
        let cache = SanctionedIdCache::from_map(entries);

        let mut ids = vec![make_id("1234567890", false)];
        cache.annotate(&mut ids);
        assert!(ids[0].sanctioned);
        assert_eq!(ids[0].sanctioned_source.as_deref(), Some("ofac"));
    }

    #[test]
    fn reload_swaps_the_whole_table_atomically() {
        let cache = SanctionedIdCache::new();
        assert!(cache.is_empty());
        let mut entries = HashMap::new();
        entries.insert(
            "111".to_string(),
            SanctionRecord {
                name: "X".to_string(),
                source: "y".to_string(),
                entity_type: EntityType::Person,
            },
        );
        cache.reload(entries);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unmatched_ids_remain_unsanctioned() {
        let cache = SanctionedIdCache::new();
        let mut ids = vec![make_id("999", true)];
        cache.annotate(&mut ids);
        assert!(!ids[0].sanctioned);
    }
}
