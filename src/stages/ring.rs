//! RingStage: fallback placement for types whose stamp ran out of room.
//!
//! Tiles are taken from square rings of growing Chebyshev radius inside the
//! type's placement range. The cardinal cross, every offset the stamp
//! template claims or keeps open and the perimeter ring are left alone. With
//! `checkerboard` set only tiles with the anchor's `(x + y)` parity are used,
//! so fallback structures always keep a walkable diagonal between them.
//!
//! Relay links are the exception: the ones the hub has no room for go next to
//! resource nodes and the controller before any anchor ring is tried.

use crate::constants::PRIORITY_ORDER;
use crate::location::*;
use crate::request::RequestOutcome;
use crate::stage::*;
use crate::stamps::StampSet;
use crate::structure::StructureType;
use fnv::FnvHashSet;
use itertools::Itertools;
use log::*;

pub struct RingStage {
    reserved: FnvHashSet<(i16, i16)>,
}

impl RingStage {
    /// Ring search that steers clear of every offset `stamps` claims or keeps open.
    pub fn new(stamps: &StampSet) -> Self {
        RingStage {
            reserved: stamps
                .reserved_offsets()
                .map(|(dx, dy)| (dx as i16, dy as i16))
                .collect(),
        }
    }

    /// Tiles no fallback structure may take, whatever their parity.
    fn is_reserved(&self, ctx: &PlanContext, dx: i16, dy: i16) -> bool {
        dx == 0
            || dy == 0
            || self.reserved.contains(&(dx, dy))
            || dx.abs().max(dy.abs()) == ctx.config.defense.perimeter_radius as i16
    }

    fn is_eligible(&self, ctx: &PlanContext, dx: i16, dy: i16) -> bool {
        if self.is_reserved(ctx, dx, dy) {
            return false;
        }
        !ctx.config.ring.checkerboard || (dx + dy) % 2 == 0
    }

    fn fill(
        &self,
        ctx: &mut PlanContext,
        structure_type: StructureType,
        remaining: &mut u32,
    ) {
        let range = ctx.config.ring.range(structure_type);

        for radius in range.min..=range.max {
            for (dx, dy) in chebyshev_ring(radius) {
                if *remaining == 0 || ctx.need(structure_type) == 0 {
                    return;
                }
                if !self.is_eligible(ctx, dx, dy) {
                    continue;
                }
                if let Some(loc) = ctx.anchor.offset(dx, dy) {
                    if ctx.place(loc, structure_type, remaining).is_some() {
                        trace!(
                            "ring: {} at ({}, {}) radius {}",
                            structure_type,
                            loc.x(),
                            loc.y(),
                            radius
                        );
                    }
                }
            }
        }
    }

    /// One relay link within `node_link_range` of every resource node, then one
    /// within `controller_link_range` of the controller. Landmarks that already
    /// have a link in range are skipped.
    fn place_landmark_links(&self, ctx: &mut PlanContext, remaining: &mut u32) {
        let anchor = ctx.anchor;
        let node_range = ctx.config.ring.node_link_range;
        let controller_range = ctx.config.ring.controller_link_range;
        let landmarks: Vec<(Location, u8)> = ctx
            .grid
            .resource_nodes()
            .iter()
            .sorted_by_key(|loc| (loc.distance_to(anchor), **loc))
            .map(|loc| (*loc, node_range))
            .chain(ctx.grid.controller().map(|loc| (loc, controller_range)))
            .collect();
        let mut links = ctx.type_locations(StructureType::RelayLink);

        for (landmark, range) in landmarks {
            if links.iter().any(|link| link.distance_to(landmark) <= range) {
                continue;
            }
            if let Some(loc) = self.landmark_link(ctx, landmark, range, remaining) {
                debug!(
                    "{}: relay link at ({}, {}) for ({}, {})",
                    ctx.colony.name,
                    loc.x(),
                    loc.y(),
                    landmark.x(),
                    landmark.y()
                );
                links.push(loc);
            }
        }
    }

    fn landmark_link(
        &self,
        ctx: &mut PlanContext,
        landmark: Location,
        range: u8,
        remaining: &mut u32,
    ) -> Option<Location> {
        for radius in 1..=range {
            for (dx, dy) in chebyshev_ring(radius) {
                if *remaining == 0 || ctx.need(StructureType::RelayLink) == 0 {
                    return None;
                }
                let loc = match landmark.offset(dx, dy) {
                    Some(loc) => loc,
                    None => continue,
                };
                let (ax, ay) = loc.delta_from(ctx.anchor);
                if self.is_reserved(ctx, ax, ay) {
                    continue;
                }
                if ctx.place(loc, StructureType::RelayLink, remaining)
                    == Some(RequestOutcome::Accepted)
                {
                    return Some(loc);
                }
            }
        }
        None
    }
}

impl Default for RingStage {
    fn default() -> Self {
        RingStage::new(&StampSet::default())
    }
}

impl PlannerStage for RingStage {
    fn name(&self) -> &str {
        "ring"
    }

    fn run(&self, ctx: &mut PlanContext, budget: u32) -> u32 {
        let mut remaining = budget;

        for structure_type in PRIORITY_ORDER {
            if remaining == 0 {
                break;
            }
            if ctx.need(structure_type) == 0 {
                continue;
            }
            if structure_type == StructureType::RelayLink {
                self.place_landmark_links(ctx, &mut remaining);
            }
            self.fill(ctx, structure_type, &mut remaining);
        }

        budget - remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::ColonyState;
    use crate::config::*;
    use crate::observation::ColonySnapshot;
    use crate::request::*;
    use crate::stage::tests::context;
    use crate::stamps::Stamp;
    use crate::structure::RangePolicy;

    fn run_ring(
        stage: &RingStage,
        grid: &ColonySnapshot,
        config: &PlannerConfig,
        tier: u8,
        budget: u32,
    ) -> RecordingSink {
        let mut colony = ColonyState::new("W1N1", tier);
        let mut sink = RecordingSink::new();
        {
            let mut ctx = context(grid, &mut colony, config, &mut sink);
            stage.run(&mut ctx, budget);
        }
        sink
    }

    #[test]
    fn fills_overflow_outside_the_template() {
        let grid = ColonySnapshot::default();
        let config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::RelayLink, vec![4])
                .unwrap(),
            ..Default::default()
        };
        let stamps = StampSet::default();
        let stage = RingStage::new(&stamps);
        let sink = run_ring(&stage, &grid, &config, 5, 10);

        let anchor = Location::from_xy(25, 25);
        let links = sink.of_type(StructureType::RelayLink);
        assert_eq!(links.len(), 4);
        for loc in links {
            let (dx, dy) = loc.delta_from(anchor);
            assert!(dx != 0 && dy != 0);
            assert_eq!((dx + dy) % 2, 0);
            assert!(stamps
                .reserved_offsets()
                .all(|offset| offset != (dx as i8, dy as i8)));
            let range = config.ring.range(StructureType::RelayLink);
            let distance = loc.distance_to(anchor);
            assert!(distance >= range.min && distance <= range.max);
        }
    }

    #[test]
    fn template_spokes_and_lab_center_stay_free() {
        let grid = ColonySnapshot::default();
        let mut config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::GrowthExtension, vec![200])
                .unwrap(),
            ..Default::default()
        };
        config.ring.checkerboard = false;
        config
            .ring
            .ranges
            .insert(StructureType::GrowthExtension, RangePolicy::new(2, 5));
        let sink = run_ring(&RingStage::default(), &grid, &config, 8, 200);

        // Rings 2 to 5 are fully claimed by stamps or kept open.
        assert_eq!(sink.total(), 0);
    }

    #[test]
    fn links_go_next_to_landmarks_first() {
        let mut grid = ColonySnapshot::default();
        grid.add_resource_node(Location::from_xy(10, 10));
        grid.set_controller(Location::from_xy(40, 40));
        let config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::RelayLink, vec![3])
                .unwrap(),
            ..Default::default()
        };
        let sink = run_ring(&RingStage::default(), &grid, &config, 5, 10);

        let links = sink.of_type(StructureType::RelayLink);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0], Location::from_xy(9, 9));
        assert_eq!(links[1], Location::from_xy(39, 39));
        assert!(links[2].distance_to(Location::from_xy(25, 25)) <= 8);
    }

    #[test]
    fn served_landmarks_get_no_second_link() {
        let mut grid = ColonySnapshot::default();
        let node = Location::from_xy(10, 10);
        grid.add_resource_node(node);
        grid.add_structure(Location::from_xy(12, 11), StructureType::RelayLink);
        grid.set_controller(Location::from_xy(40, 40));
        grid.add_pending(Location::from_xy(36, 37), StructureType::RelayLink);
        let config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::RelayLink, vec![3])
                .unwrap(),
            ..Default::default()
        };
        let sink = run_ring(&RingStage::default(), &grid, &config, 5, 10);

        let links = sink.of_type(StructureType::RelayLink);
        assert_eq!(links.len(), 1);
        assert!(links[0].distance_to(node) > 2);
        assert!(links[0].distance_to(Location::from_xy(25, 25)) <= 8);
    }

    #[test]
    fn nearer_rings_are_used_first() {
        let grid = ColonySnapshot::default();
        let mut config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::SpawnPoint, vec![2])
                .unwrap(),
            ..Default::default()
        };
        config.ring.checkerboard = false;
        let stage = RingStage::new(&StampSet::new(vec![]));
        let sink = run_ring(&stage, &grid, &config, 1, 10);

        let anchor = Location::from_xy(25, 25);
        let spawns = sink.of_type(StructureType::SpawnPoint);
        assert_eq!(spawns.len(), 2);
        assert!(spawns.iter().all(|loc| loc.distance_to(anchor) == 1));
    }

    #[test]
    fn perimeter_radius_is_left_for_barriers() {
        let grid = ColonySnapshot::default();
        let mut config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::LongRangeSensor, vec![40])
                .unwrap(),
            ..Default::default()
        };
        config
            .ring
            .ranges
            .insert(StructureType::LongRangeSensor, RangePolicy::new(6, 7));
        let stage = RingStage::new(&StampSet::new(vec![Stamp::new(
            StructureType::LongRangeSensor,
            &[],
        )]));
        let sink = run_ring(&stage, &grid, &config, 8, 40);

        let anchor = Location::from_xy(25, 25);
        let sensors = sink.of_type(StructureType::LongRangeSensor);
        assert!(!sensors.is_empty());
        assert!(sensors.iter().all(|loc| loc.distance_to(anchor) == 7));
    }

    #[test]
    fn stops_when_budget_runs_out() {
        let grid = ColonySnapshot::default();
        let config = PlannerConfig {
            quotas: QuotaTable::empty()
                .with_row(StructureType::GrowthExtension, vec![100])
                .unwrap(),
            ..Default::default()
        };
        let stage = RingStage::default();
        let mut colony = ColonyState::new("W1N1", 8);
        let mut sink = RecordingSink::new();
        let issued = {
            let mut ctx = context(&grid, &mut colony, &config, &mut sink);
            stage.run(&mut ctx, 7)
        };
        assert_eq!(issued, 7);
        assert_eq!(sink.total(), 7);
    }
}
