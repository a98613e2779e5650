//! Tunable planner configuration.
//!
//! Every field has a default, so a JSON document only needs to name the
//! values it changes:
//!
//! ```
//! use colony_foreman::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_json(r#"{ "budget": 8, "defense": { "perimeter_radius": 7 } }"#).unwrap();
//! assert_eq!(config.budget, 8);
//! assert_eq!(config.defense.perimeter_radius, 7);
//! assert_eq!(config.defense.overlay_radius, 4);
//! ```

use crate::constants::*;
use crate::error::ConfigError;
use crate::structure::*;
use fnv::{FnvHashMap, FnvHasher};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum requests a single pass may issue.
    pub budget: u32,
    /// The planner stays idle while this many requests are outstanding.
    pub max_outstanding: u32,
    pub anchor: AnchorWeights,
    pub ring: RingConfig,
    pub roads: RoadConfig,
    pub defense: DefenseConfig,
    pub quotas: QuotaTable,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            budget: 5,
            max_outstanding: 10,
            anchor: AnchorWeights::default(),
            ring: RingConfig::default(),
            roads: RoadConfig::default(),
            defense: DefenseConfig::default(),
            quotas: QuotaTable::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget == 0 {
            return Err(ConfigError::ZeroBudget);
        }
        for (structure_type, range) in &self.ring.ranges {
            if range.min > range.max {
                return Err(ConfigError::InvalidRange {
                    structure_type: *structure_type,
                });
            }
        }
        self.quotas.validate()
    }
}

/// Weights of the four additive anchor score terms. Lower scores win.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorWeights {
    /// Half-width of the square scanned around the landmark centroid.
    pub search_radius: u8,
    pub ideal_controller_distance: f32,
    pub controller_weight: f32,
    pub resource_weight: f32,
    /// Candidates closer than this to the grid edge pay `edge_penalty`.
    pub edge_margin: u8,
    pub edge_penalty: f32,
    pub openness_radius: u8,
    pub openness_weight: f32,
    /// Candidates with more impassable tiles than this within
    /// `openness_radius` are rejected outright.
    pub max_impassable: u32,
}

impl Default for AnchorWeights {
    fn default() -> Self {
        AnchorWeights {
            search_radius: 5,
            ideal_controller_distance: 3.0,
            controller_weight: 1.0,
            resource_weight: 0.5,
            edge_margin: 7,
            edge_penalty: 100.0,
            openness_radius: 2,
            openness_weight: 2.0,
            max_impassable: 4,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Only use tiles with the same `(x + y)` parity as the anchor.
    pub checkerboard: bool,
    /// Per-type overrides of `placement_range`.
    pub ranges: FnvHashMap<StructureType, RangePolicy>,
    /// Relay links beyond the template go within this range of each
    /// resource node before falling back to rings around the anchor.
    pub node_link_range: u8,
    /// Same for the controller.
    pub controller_link_range: u8,
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            checkerboard: true,
            ranges: FnvHashMap::default(),
            node_link_range: 2,
            controller_link_range: 4,
        }
    }
}

impl RingConfig {
    pub fn range(&self, structure_type: StructureType) -> RangePolicy {
        self.ranges
            .get(&structure_type)
            .copied()
            .unwrap_or_else(|| placement_range(structure_type))
    }
}

/// Step costs handed to the path finder.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainWeights {
    /// Tiles that hold or are queued for a route tile.
    pub route: u32,
    pub open: u32,
    pub difficult: u32,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        TerrainWeights {
            route: 1,
            open: 2,
            difficult: 10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    pub min_tier: u8,
    /// Requests per target per pass, so one long path cannot starve the rest.
    pub tiles_per_target: u32,
    pub weights: TerrainWeights,
}

impl Default for RoadConfig {
    fn default() -> Self {
        RoadConfig {
            min_tier: 3,
            tiles_per_target: 3,
            weights: TerrainWeights::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    pub overlay_min_tier: u8,
    pub perimeter_min_tier: u8,
    pub overlay_radius: u8,
    pub perimeter_radius: u8,
    /// Ticks before a completed perimeter is scanned again.
    pub perimeter_recheck_interval: u64,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        DefenseConfig {
            overlay_min_tier: 3,
            perimeter_min_tier: 4,
            overlay_radius: 4,
            perimeter_radius: 6,
            perimeter_recheck_interval: 100,
        }
    }
}

/// Per-type, per-tier structure quotas.
///
/// Rows index by tier; tiers past the end of a row reuse its last entry.
/// Types without a row fall back to `max_structures_at_tier` unless the table
/// was created with `QuotaTable::empty`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaTable {
    pub standard_defaults: bool,
    pub rows: FnvHashMap<StructureType, Vec<u32>>,
}

impl Default for QuotaTable {
    fn default() -> Self {
        QuotaTable {
            standard_defaults: true,
            rows: FnvHashMap::default(),
        }
    }
}

impl QuotaTable {
    /// A table where every type without an explicit row has quota zero.
    pub fn empty() -> Self {
        QuotaTable {
            standard_defaults: false,
            rows: FnvHashMap::default(),
        }
    }

    pub fn with_row(
        mut self,
        structure_type: StructureType,
        row: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        check_row(structure_type, &row)?;
        self.rows.insert(structure_type, row);
        Ok(self)
    }

    pub fn quota(&self, structure_type: StructureType, tier: u8) -> u32 {
        match self.rows.get(&structure_type) {
            Some(row) => row
                .get(tier as usize)
                .or_else(|| row.last())
                .copied()
                .unwrap_or(0),
            None if self.standard_defaults => max_structures_at_tier(structure_type, tier),
            None => 0,
        }
    }

    /// Hash of the table contents, stable across processes so it can be
    /// persisted next to quota rows computed from this table.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        self.standard_defaults.hash(&mut hasher);
        for (structure_type, row) in self.rows.iter().sorted_by_key(|(st, _)| **st) {
            structure_type.hash(&mut hasher);
            row.hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rows
            .iter()
            .try_for_each(|(structure_type, row)| check_row(*structure_type, row))
    }
}

fn check_row(structure_type: StructureType, row: &[u32]) -> Result<(), ConfigError> {
    match row.windows(2).position(|pair| pair[1] < pair[0]) {
        Some(index) => Err(ConfigError::NonMonotonicQuota {
            structure_type,
            tier: (index + 1) as u8,
        }),
        None => Ok(()),
    }
}
