//! DefenseStage: protective overlays over the core and a barrier ring.
//!
//! Overlays go on every built defense-relevant structure near the anchor.
//! Barriers go on the Chebyshev ring at `perimeter_radius`, except where the
//! ring crosses the cardinal axes through the anchor; those four tiles stay
//! open as gates. The ring is classified after each scan and a complete ring
//! is only rescanned once `perimeter_recheck_interval` ticks have passed.

use crate::colony::PerimeterStatus;
use crate::location::*;
use crate::request::RequestOutcome;
use crate::stage::*;
use crate::structure::StructureType;
use itertools::Itertools;
use log::*;

#[derive(Default)]
pub struct DefenseStage;

impl DefenseStage {
    fn place_overlays(&self, ctx: &mut PlanContext, remaining: &mut u32) {
        let radius = ctx.config.defense.overlay_radius;
        let anchor = ctx.anchor;

        let targets: Vec<Location> = StructureType::ALL
            .iter()
            .filter(|st| st.is_defense_relevant())
            .flat_map(|st| ctx.built_locations(*st))
            .filter(|loc| loc.distance_to(anchor) <= radius)
            .sorted_by_key(|loc| (loc.distance_to(anchor), *loc))
            .dedup()
            .collect();

        for loc in targets {
            if *remaining == 0 {
                return;
            }
            ctx.place(loc, StructureType::ProtectiveOverlay, remaining);
        }
    }

    fn perimeter_is_fresh(&self, ctx: &PlanContext) -> bool {
        ctx.colony.perimeter == PerimeterStatus::Complete
            && ctx
                .colony
                .last_classification_tick
                .is_some_and(|last| {
                    ctx.tick.saturating_sub(last) < ctx.config.defense.perimeter_recheck_interval
                })
    }

    fn place_perimeter(&self, ctx: &mut PlanContext, remaining: &mut u32) {
        let mut satisfied = 0;
        let mut missing = 0;

        for (dx, dy) in chebyshev_ring(ctx.config.defense.perimeter_radius) {
            if dx == 0 || dy == 0 {
                continue;
            }
            let loc = match ctx.anchor.offset(dx, dy) {
                Some(loc) => loc,
                None => continue,
            };

            match ctx.check(loc, StructureType::Barrier) {
                TileCheck::Satisfied => satisfied += 1,
                TileCheck::Blocked => {
                    trace!("perimeter: ({}, {}) blocked", loc.x(), loc.y());
                }
                TileCheck::Clear => match ctx.place(loc, StructureType::Barrier, remaining) {
                    Some(RequestOutcome::Accepted) => satisfied += 1,
                    Some(RequestOutcome::Rejected) | None => missing += 1,
                },
            }
        }

        let status = match (satisfied, missing) {
            (_, 0) => PerimeterStatus::Complete,
            (0, _) => PerimeterStatus::Unplanned,
            _ => PerimeterStatus::Partial,
        };
        if status != ctx.colony.perimeter {
            debug!("{}: perimeter now {:?}", ctx.colony.name, status);
        }
        let tick = ctx.tick;
        ctx.colony.record_perimeter(status, tick);
    }
}

impl PlannerStage for DefenseStage {
    fn name(&self) -> &str {
        "defense"
    }

    fn is_applicable(&self, ctx: &PlanContext) -> bool {
        let defense = &ctx.config.defense;
        ctx.tier() >= defense.overlay_min_tier.min(defense.perimeter_min_tier)
    }

    fn run(&self, ctx: &mut PlanContext, budget: u32) -> u32 {
        let mut remaining = budget;
        let tier = ctx.tier();

        if tier >= ctx.config.defense.overlay_min_tier {
            self.place_overlays(ctx, &mut remaining);
        }
        if tier >= ctx.config.defense.perimeter_min_tier && !self.perimeter_is_fresh(ctx) {
            self.place_perimeter(ctx, &mut remaining);
        }

        budget - remaining
    }
}
