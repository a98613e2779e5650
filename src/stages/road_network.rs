//! RoadNetworkStage: route tiles from the anchor to every landmark.
//!
//! Targets are handled nearest first. Tiles that already hold or are queued
//! for a route tile cost less than open ground, so later paths merge onto the
//! trunk laid by earlier ones instead of running parallel to it.

use crate::config::TerrainWeights;
use crate::location::*;
use crate::path::*;
use crate::stage::*;
use crate::structure::StructureType;
use crate::terrain::TerrainClass;
use fnv::FnvHashSet;
use log::*;

/// Step costs for road paths, seen through the current pass.
pub struct RoadCosts<'c, 'a> {
    ctx: &'c PlanContext<'a>,
    weights: TerrainWeights,
    goal: Location,
}

impl<'c, 'a> TileCosts for RoadCosts<'c, 'a> {
    fn cost(&self, loc: Location) -> Option<u32> {
        // Landmarks themselves are never walkable; the path just has to reach them.
        if loc == self.goal {
            return Some(self.weights.open);
        }
        let terrain = self.ctx.grid.terrain_at(loc);
        if terrain == TerrainClass::Impassable {
            return None;
        }
        // A barrier laid over a road crossing the perimeter does not cut it.
        if self.ctx.has_type(loc, StructureType::RouteTile)
            && self
                .ctx
                .structures_at(loc)
                .all(|st| st.is_walkable() || st == StructureType::Barrier)
        {
            return Some(self.weights.route);
        }
        if !self.ctx.is_walkable(loc) {
            return None;
        }
        match terrain {
            TerrainClass::Difficult => Some(self.weights.difficult),
            _ => Some(self.weights.open),
        }
    }

    fn min_cost(&self) -> u32 {
        self.weights
            .route
            .min(self.weights.open)
            .min(self.weights.difficult)
    }
}

pub struct RoadNetworkStage<P: PathFinder = AstarPathFinder> {
    path_finder: P,
}

impl<P: PathFinder> RoadNetworkStage<P> {
    pub fn new(path_finder: P) -> Self {
        RoadNetworkStage { path_finder }
    }

    /// Resource nodes, the controller and the energy store, nearest first.
    fn targets(ctx: &PlanContext) -> Vec<Location> {
        let mut targets: Vec<Location> = ctx
            .grid
            .resource_nodes()
            .iter()
            .copied()
            .chain(ctx.grid.controller())
            .chain(ctx.find_type(StructureType::EnergyStore))
            .filter(|loc| *loc != ctx.anchor)
            .collect();
        targets.sort_by_key(|loc| (loc.distance_to(ctx.anchor), *loc));
        targets.dedup();
        targets
    }
}

impl Default for RoadNetworkStage {
    fn default() -> Self {
        RoadNetworkStage::new(AstarPathFinder)
    }
}

impl<P: PathFinder> PlannerStage for RoadNetworkStage<P> {
    fn name(&self) -> &str {
        "road_network"
    }

    fn is_applicable(&self, ctx: &PlanContext) -> bool {
        ctx.tier() >= ctx.config.roads.min_tier
    }

    fn run(&self, ctx: &mut PlanContext, budget: u32) -> u32 {
        let mut remaining = budget;
        let mut road_tiles: FnvHashSet<Location> = FnvHashSet::default();
        let per_target = ctx.config.roads.tiles_per_target;
        let weights = ctx.config.roads.weights;

        for target in Self::targets(ctx) {
            if remaining == 0 {
                break;
            }

            let path = {
                let costs = RoadCosts {
                    ctx: &*ctx,
                    weights,
                    goal: target,
                };
                self.path_finder.shortest_path(ctx.anchor, target, &costs)
            };
            let path = match path {
                Some(path) => path,
                None => {
                    debug!(
                        "{}: no road path to ({}, {})",
                        ctx.colony.name,
                        target.x(),
                        target.y()
                    );
                    continue;
                }
            };

            let mut placed = 0;
            for loc in path {
                if remaining == 0 || placed >= per_target {
                    break;
                }
                if road_tiles.contains(&loc) {
                    continue;
                }
                if ctx.has_type(loc, StructureType::RouteTile) {
                    road_tiles.insert(loc);
                    continue;
                }
                if ctx.check(loc, StructureType::RouteTile) != TileCheck::Clear {
                    continue;
                }
                if ctx
                    .place(loc, StructureType::RouteTile, &mut remaining)
                    .is_some()
                {
                    placed += 1;
                    road_tiles.insert(loc);
                }
            }
        }

        budget - remaining
    }
}
