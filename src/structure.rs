use serde::{Deserialize, Serialize};
use std::fmt;

/// Every structure the planner knows how to request.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    SpawnPoint,
    EnergyStore,
    TradePost,
    ProductionPost,
    PowerFeed,
    DefenseTower,
    ReagentLab,
    RelayLink,
    GrowthExtension,
    LongRangeSensor,
    AreaWeapon,
    ProtectiveOverlay,
    Barrier,
    RouteTile,
}

impl StructureType {
    pub const ALL: [StructureType; 14] = [
        StructureType::SpawnPoint,
        StructureType::EnergyStore,
        StructureType::TradePost,
        StructureType::ProductionPost,
        StructureType::PowerFeed,
        StructureType::DefenseTower,
        StructureType::ReagentLab,
        StructureType::RelayLink,
        StructureType::GrowthExtension,
        StructureType::LongRangeSensor,
        StructureType::AreaWeapon,
        StructureType::ProtectiveOverlay,
        StructureType::Barrier,
        StructureType::RouteTile,
    ];

    /// Units can walk over this structure.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            StructureType::RouteTile | StructureType::ProtectiveOverlay
        )
    }

    /// Structures that receive a protective overlay when they sit near the anchor.
    pub fn is_defense_relevant(self) -> bool {
        matches!(
            self,
            StructureType::SpawnPoint
                | StructureType::GrowthExtension
                | StructureType::DefenseTower
                | StructureType::EnergyStore
                | StructureType::TradePost
                | StructureType::ProductionPost
                | StructureType::PowerFeed
                | StructureType::RelayLink
                | StructureType::ReagentLab
        )
    }

    /// Whether a new `placing` structure may share a tile with an existing or
    /// queued `self`. Identical types are handled by the caller as "already
    /// satisfied".
    pub fn allows(self, placing: StructureType) -> bool {
        match (self, placing) {
            // A planned road keeps its course under a barrier.
            (StructureType::RouteTile, _) => true,
            (_, StructureType::Barrier) | (StructureType::Barrier, _) => false,
            (StructureType::ProtectiveOverlay, _) | (_, StructureType::ProtectiveOverlay) => true,
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StructureType::SpawnPoint => "spawn_point",
            StructureType::EnergyStore => "energy_store",
            StructureType::TradePost => "trade_post",
            StructureType::ProductionPost => "production_post",
            StructureType::PowerFeed => "power_feed",
            StructureType::DefenseTower => "defense_tower",
            StructureType::ReagentLab => "reagent_lab",
            StructureType::RelayLink => "relay_link",
            StructureType::GrowthExtension => "growth_extension",
            StructureType::LongRangeSensor => "long_range_sensor",
            StructureType::AreaWeapon => "area_weapon",
            StructureType::ProtectiveOverlay => "protective_overlay",
            StructureType::Barrier => "barrier",
            StructureType::RouteTile => "route_tile",
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Min/max Chebyshev distance from the anchor used by the ring fallback.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct RangePolicy {
    pub min: u8,
    pub max: u8,
}

impl RangePolicy {
    pub const fn new(min: u8, max: u8) -> Self {
        RangePolicy { min, max }
    }
}

impl Default for RangePolicy {
    fn default() -> Self {
        RangePolicy::new(2, 8)
    }
}
