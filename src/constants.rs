use crate::structure::*;

pub const ROOM_WIDTH: u8 = 50;
pub const ROOM_HEIGHT: u8 = 50;

/// Outermost tiles only accept route tiles.
pub const ROOM_BUILD_BORDER: u8 = 1;

pub const MAX_TIER: u8 = 8;

/// Order in which the stamp and ring stages spend budget.
pub const PRIORITY_ORDER: [StructureType; 11] = [
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
];

/// Maximum number of a given structure type allowed at a given tier.
/// Returns 0 if the structure is not available at that tier. Tiers above
/// `MAX_TIER` behave like `MAX_TIER`.
///
/// Route tiles have no per-tier limit. Barriers and overlays share the same
/// limits.
pub fn max_structures_at_tier(structure_type: StructureType, tier: u8) -> u32 {
    let tier = tier.min(MAX_TIER);
    match structure_type {
        StructureType::SpawnPoint => match tier {
            0 => 0,
            1..=6 => 1,
            7 => 2,
            _ => 3,
        },
        StructureType::GrowthExtension => match tier {
            0 | 1 => 0,
            2 => 5,
            3 => 10,
            4 => 20,
            5 => 30,
            6 => 40,
            7 => 50,
            _ => 60,
        },
        StructureType::RelayLink => match tier {
            0..=4 => 0,
            5 => 2,
            6 => 3,
            7 => 4,
            _ => 6,
        },
        StructureType::EnergyStore => match tier {
            0..=3 => 0,
            _ => 1,
        },
        StructureType::DefenseTower => match tier {
            0..=2 => 0,
            3..=4 => 1,
            5..=6 => 2,
            7 => 3,
            _ => 6,
        },
        StructureType::LongRangeSensor | StructureType::PowerFeed | StructureType::AreaWeapon => {
            match tier {
                0..=7 => 0,
                _ => 1,
            }
        }
        StructureType::ReagentLab => match tier {
            0..=5 => 0,
            6 => 3,
            7 => 6,
            _ => 10,
        },
        StructureType::TradePost => match tier {
            0..=5 => 0,
            _ => 1,
        },
        StructureType::ProductionPost => match tier {
            0..=6 => 0,
            _ => 1,
        },
        StructureType::ProtectiveOverlay | StructureType::Barrier => match tier {
            0 | 1 => 0,
            _ => 2500, // Effectively unlimited
        },
        StructureType::RouteTile => 2500,
    }
}

/// Distance band (from the anchor) the ring fallback searches for each type.
pub fn placement_range(structure_type: StructureType) -> RangePolicy {
    match structure_type {
        StructureType::SpawnPoint => RangePolicy::new(1, 4),
        StructureType::EnergyStore
        | StructureType::TradePost
        | StructureType::ProductionPost
        | StructureType::PowerFeed => RangePolicy::new(1, 5),
        StructureType::DefenseTower => RangePolicy::new(2, 5),
        StructureType::ReagentLab => RangePolicy::new(3, 7),
        StructureType::LongRangeSensor | StructureType::AreaWeapon => RangePolicy::new(2, 10),
        _ => RangePolicy::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotas_never_shrink_with_tier() {
        for structure_type in StructureType::ALL {
            for tier in 1..=MAX_TIER + 2 {
                assert!(
                    max_structures_at_tier(structure_type, tier)
                        >= max_structures_at_tier(structure_type, tier - 1),
                    "{} shrinks at tier {}",
                    structure_type,
                    tier
                );
            }
        }
    }

    #[test]
    fn unspecified_ranges_default() {
        assert_eq!(
            placement_range(StructureType::GrowthExtension),
            RangePolicy::new(2, 8)
        );
    }
}
