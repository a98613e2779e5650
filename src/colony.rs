//! Persisted per-colony planning state and the store that keeps it.
//!
//! `ColonyState` is passed into the planner and handed back after each pass;
//! nothing about a colony lives in process-wide state.

use crate::config::QuotaTable;
use crate::location::*;
use crate::structure::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Coarse classification of the defensive perimeter.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub enum PerimeterStatus {
    #[default]
    Unplanned,
    Partial,
    Complete,
}

/// Quota row cached for the tier and quota table it was computed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedQuotas {
    pub tier: u8,
    /// `QuotaTable::fingerprint` of the source table.
    #[serde(default)]
    pub table: u64,
    pub counts: FnvHashMap<StructureType, u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColonyState {
    pub name: String,
    pub tier: u8,
    /// Set once, never moved by the planner.
    #[serde(default)]
    pub anchor: Option<Location>,
    #[serde(default)]
    pub perimeter: PerimeterStatus,
    #[serde(default)]
    pub last_classification_tick: Option<u64>,
    #[serde(default)]
    pub quotas: Option<CachedQuotas>,
}

impl ColonyState {
    pub fn new(name: impl Into<String>, tier: u8) -> Self {
        ColonyState {
            name: name.into(),
            tier,
            anchor: None,
            perimeter: PerimeterStatus::Unplanned,
            last_classification_tick: None,
            quotas: None,
        }
    }

    /// Quota for `structure_type` at the colony's current tier, refreshing the
    /// cached row when the tier or the quota table has changed.
    pub fn quota(&mut self, table: &QuotaTable, structure_type: StructureType) -> u32 {
        self.refresh_quotas(table)
            .counts
            .get(&structure_type)
            .copied()
            .unwrap_or(0)
    }

    pub fn refresh_quotas(&mut self, table: &QuotaTable) -> &CachedQuotas {
        let tier = self.tier;
        let fingerprint = table.fingerprint();
        if self
            .quotas
            .as_ref()
            .is_some_and(|q| q.tier != tier || q.table != fingerprint)
        {
            self.quotas = None;
        }
        self.quotas.get_or_insert_with(|| CachedQuotas {
            tier,
            table: fingerprint,
            counts: StructureType::ALL
                .iter()
                .map(|st| (*st, table.quota(*st, tier)))
                .collect(),
        })
    }

    pub fn record_perimeter(&mut self, status: PerimeterStatus, tick: u64) {
        self.perimeter = status;
        self.last_classification_tick = Some(tick);
    }
}

/// Get/set access to persisted colony state, keyed by colony name.
pub trait ColonyStateStore {
    fn load(&self, colony: &str) -> Option<ColonyState>;
    fn save(&mut self, state: ColonyState);
}

/// In-memory store for offline planning and tests.
#[derive(Default, Serialize, Deserialize)]
pub struct MemoryColonyStore {
    colonies: FnvHashMap<String, ColonyState>,
}

impl MemoryColonyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: ColonyState) {
        self.colonies.insert(state.name.clone(), state);
    }

    pub fn get(&self, colony: &str) -> Option<&ColonyState> {
        self.colonies.get(colony)
    }

    pub fn get_mut(&mut self, colony: &str) -> Option<&mut ColonyState> {
        self.colonies.get_mut(colony)
    }

    /// Drop a lost colony.
    pub fn remove(&mut self, colony: &str) -> Option<ColonyState> {
        self.colonies.remove(colony)
    }
}

impl ColonyStateStore for MemoryColonyStore {
    fn load(&self, colony: &str) -> Option<ColonyState> {
        self.colonies.get(colony).cloned()
    }

    fn save(&mut self, state: ColonyState) {
        self.insert(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_cache_follows_tier() {
        let table = QuotaTable::default();
        let mut state = ColonyState::new("W1N1", 3);
        assert_eq!(state.quota(&table, StructureType::DefenseTower), 1);
        assert_eq!(state.quotas.as_ref().map(|q| q.tier), Some(3));

        state.tier = 7;
        assert_eq!(state.quota(&table, StructureType::DefenseTower), 3);
        assert_eq!(state.quotas.as_ref().map(|q| q.tier), Some(7));
    }

    #[test]
    fn quota_cache_follows_the_table() {
        let mut state = ColonyState::new("W1N1", 3);
        assert_eq!(state.quota(&QuotaTable::default(), StructureType::DefenseTower), 1);

        let no_towers = QuotaTable::empty()
            .with_row(StructureType::DefenseTower, vec![0])
            .unwrap();
        assert_eq!(state.quota(&no_towers, StructureType::DefenseTower), 0);
        assert_eq!(state.quota(&no_towers, StructureType::SpawnPoint), 0);
        assert_eq!(
            state.quotas.as_ref().map(|q| q.table),
            Some(no_towers.fingerprint())
        );

        // A record cached before the table was known is rebuilt too.
        let json = r#"{"name":"W1N1","tier":3,"quotas":{"tier":3,"counts":{"defense_tower":5}}}"#;
        let mut restored: ColonyState = serde_json::from_str(json).unwrap();
        assert_eq!(restored.quota(&QuotaTable::default(), StructureType::DefenseTower), 1);
    }

    #[test]
    fn equal_tables_share_a_fingerprint() {
        let a = QuotaTable::default()
            .with_row(StructureType::DefenseTower, vec![0, 1, 2])
            .and_then(|t| t.with_row(StructureType::RelayLink, vec![0, 0, 1]))
            .unwrap();
        let b = QuotaTable::default()
            .with_row(StructureType::RelayLink, vec![0, 0, 1])
            .and_then(|t| t.with_row(StructureType::DefenseTower, vec![0, 1, 2]))
            .unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), QuotaTable::default().fingerprint());
        assert_ne!(QuotaTable::empty().fingerprint(), QuotaTable::default().fingerprint());
    }

    #[test]
    fn state_survives_the_store() {
        let mut state = ColonyState::new("E5S2", 4);
        state.anchor = Some(Location::from_xy(24, 19));
        state.record_perimeter(PerimeterStatus::Partial, 1200);

        let json = serde_json::to_string(&state).unwrap();
        let restored: ColonyState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        let mut store = MemoryColonyStore::new();
        store.save(restored);
        assert_eq!(
            store.load("E5S2").and_then(|s| s.anchor),
            Some(Location::from_xy(24, 19))
        );
        assert!(store.remove("E5S2").is_some());
        assert!(store.load("E5S2").is_none());
    }

    #[test]
    fn records_with_an_off_grid_anchor_are_refused() {
        let json = format!(r#"{{"name":"W1N1","tier":3,"anchor":{}}}"#, (60u16 << 8) | 60);
        assert!(serde_json::from_str::<ColonyState>(&json).is_err());
    }

    #[test]
    fn older_records_default_missing_fields() {
        let restored: ColonyState = serde_json::from_str(r#"{"name":"W2N2","tier":2}"#).unwrap();
        assert_eq!(restored.anchor, None);
        assert_eq!(restored.perimeter, PerimeterStatus::Unplanned);
    }
}
