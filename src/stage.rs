//! Core types shared by the planner stages.
//!
//! `PlanContext` overlays the requests issued during the current pass on top
//! of the read-only observation, so later stages (and later candidates within
//! a stage) see earlier requests as outstanding. `PlannerStage` is the trait
//! each stage implements.

use crate::colony::ColonyState;
use crate::config::PlannerConfig;
use crate::location::*;
use crate::observation::*;
use crate::request::*;
use crate::structure::*;
use crate::terrain::TerrainClass;
use fnv::{FnvHashMap, FnvHashSet};
use log::*;

/// Result of checking whether a structure can be requested on a tile.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TileCheck {
    /// Nothing in the way; a request may be issued.
    Clear,
    /// The tile already holds (or is queued for) this structure type.
    Satisfied,
    /// Off the buildable area, impassable, occupied by something
    /// incompatible, or rejected earlier in this pass.
    Blocked,
}

pub struct PlanContext<'a> {
    pub grid: &'a dyn GridObservation,
    pub colony: &'a mut ColonyState,
    pub config: &'a PlannerConfig,
    pub anchor: Location,
    pub tick: u64,
    sink: &'a mut dyn ConstructionSink,
    built: FnvHashMap<StructureType, u32>,
    outstanding: FnvHashMap<StructureType, u32>,
    issued: FnvHashMap<Location, Vec<StructureType>>,
    rejected: FnvHashSet<(Location, StructureType)>,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        grid: &'a dyn GridObservation,
        colony: &'a mut ColonyState,
        config: &'a PlannerConfig,
        anchor: Location,
        tick: u64,
        sink: &'a mut dyn ConstructionSink,
    ) -> Self {
        let mut built: FnvHashMap<StructureType, u32> = FnvHashMap::default();
        let mut outstanding: FnvHashMap<StructureType, u32> = FnvHashMap::default();
        for (_, occupants) in grid.occupied_tiles() {
            for occupant in occupants {
                match occupant {
                    Occupant::Structure(st) => *built.entry(*st).or_default() += 1,
                    Occupant::PendingRequest(st) => *outstanding.entry(*st).or_default() += 1,
                    Occupant::ResourceNode | Occupant::Controller => {}
                }
            }
        }

        PlanContext {
            grid,
            colony,
            config,
            anchor,
            tick,
            sink,
            built,
            outstanding,
            issued: FnvHashMap::default(),
            rejected: FnvHashSet::default(),
        }
    }

    pub fn tier(&self) -> u8 {
        self.colony.tier
    }

    pub fn built(&self, structure_type: StructureType) -> u32 {
        self.built.get(&structure_type).copied().unwrap_or(0)
    }

    /// Pending requests from the observation plus requests accepted this pass.
    pub fn outstanding(&self, structure_type: StructureType) -> u32 {
        self.outstanding.get(&structure_type).copied().unwrap_or(0)
    }

    pub fn quota(&mut self, structure_type: StructureType) -> u32 {
        self.colony.quota(&self.config.quotas, structure_type)
    }

    /// How many more of `structure_type` the tier allows.
    pub fn need(&mut self, structure_type: StructureType) -> u32 {
        let have = self.built(structure_type) + self.outstanding(structure_type);
        self.quota(structure_type).saturating_sub(have)
    }

    /// Number of requests accepted so far in this pass.
    pub fn issued_count(&self) -> usize {
        self.issued.values().map(|v| v.len()).sum()
    }

    /// Built, pending or issued structure types on a tile.
    pub fn structures_at(&self, loc: Location) -> impl Iterator<Item = StructureType> + '_ {
        self.grid
            .occupants_at(loc)
            .iter()
            .filter_map(|o| o.structure_type())
            .chain(self.issued.get(&loc).into_iter().flatten().copied())
    }

    pub fn has_type(&self, loc: Location, structure_type: StructureType) -> bool {
        self.structures_at(loc).any(|st| st == structure_type)
    }

    /// Built structures of a type, in location order.
    pub fn built_locations(&self, structure_type: StructureType) -> Vec<Location> {
        let mut locations: Vec<Location> = self
            .grid
            .occupied_tiles()
            .filter(|(_, occupants)| occupants.contains(&Occupant::Structure(structure_type)))
            .map(|(loc, _)| loc)
            .collect();
        locations.sort();
        locations
    }

    /// Every location holding (or queued for) a structure type, in location order.
    pub fn type_locations(&self, structure_type: StructureType) -> Vec<Location> {
        let issued = self
            .issued
            .iter()
            .filter(|(_, types)| types.contains(&structure_type))
            .map(|(loc, _)| *loc);
        let mut locations: Vec<Location> = self
            .grid
            .occupied_tiles()
            .filter(|(_, occupants)| {
                occupants
                    .iter()
                    .any(|o| o.structure_type() == Some(structure_type))
            })
            .map(|(loc, _)| loc)
            .chain(issued)
            .collect();
        locations.sort();
        locations.dedup();
        locations
    }

    /// Any location holding (or queued for) a structure type.
    pub fn find_type(&self, structure_type: StructureType) -> Option<Location> {
        self.type_locations(structure_type).first().copied()
    }

    /// Units can walk across the tile once everything on it is built.
    pub fn is_walkable(&self, loc: Location) -> bool {
        self.grid.terrain_at(loc) != TerrainClass::Impassable
            && self.grid.occupants_at(loc).iter().all(|o| match o {
                Occupant::Structure(st) | Occupant::PendingRequest(st) => st.is_walkable(),
                Occupant::ResourceNode | Occupant::Controller => false,
            })
            && self
                .issued
                .get(&loc)
                .map(|types| types.iter().all(|st| st.is_walkable()))
                .unwrap_or(true)
    }

    /// Standard buildability check shared by every stage.
    pub fn check(&self, loc: Location, structure_type: StructureType) -> TileCheck {
        if structure_type != StructureType::RouteTile && !loc.is_buildable_interior() {
            return TileCheck::Blocked;
        }
        if self.grid.terrain_at(loc) == TerrainClass::Impassable {
            return TileCheck::Blocked;
        }

        let mut blocked = false;
        for occupant in self.grid.occupants_at(loc) {
            match occupant {
                Occupant::Structure(st) | Occupant::PendingRequest(st) => {
                    if *st == structure_type {
                        return TileCheck::Satisfied;
                    }
                    blocked |= !st.allows(structure_type);
                }
                Occupant::ResourceNode | Occupant::Controller => blocked = true,
            }
        }
        for st in self.issued.get(&loc).into_iter().flatten() {
            if *st == structure_type {
                return TileCheck::Satisfied;
            }
            blocked |= !st.allows(structure_type);
        }

        if blocked || self.rejected.contains(&(loc, structure_type)) {
            TileCheck::Blocked
        } else {
            TileCheck::Clear
        }
    }

    /// Send a request to the sink and record the outcome.
    pub fn request(&mut self, loc: Location, structure_type: StructureType) -> RequestOutcome {
        let outcome = self.sink.request_construction(loc, structure_type);
        match outcome {
            RequestOutcome::Accepted => {
                self.issued.entry(loc).or_default().push(structure_type);
                *self.outstanding.entry(structure_type).or_default() += 1;
            }
            RequestOutcome::Rejected => {
                debug!(
                    "{}: {} at ({}, {}) rejected",
                    self.colony.name,
                    structure_type,
                    loc.x(),
                    loc.y()
                );
                self.rejected.insert((loc, structure_type));
            }
        }
        outcome
    }

    /// Issue a request for `structure_type` at `loc` if the tile is clear, the
    /// tier quota has room and budget remains. Every issued request costs one
    /// unit of `remaining`, whether or not the sink accepts it.
    pub fn place(
        &mut self,
        loc: Location,
        structure_type: StructureType,
        remaining: &mut u32,
    ) -> Option<RequestOutcome> {
        if *remaining == 0 || self.check(loc, structure_type) != TileCheck::Clear {
            return None;
        }
        if self.need(structure_type) == 0 {
            trace!("{}: {} quota reached", self.colony.name, structure_type);
            return None;
        }
        *remaining -= 1;
        Some(self.request(loc, structure_type))
    }
}

/// A stage of the per-tick planning pass.
///
/// Stages are stateless; everything they read comes from the `PlanContext`,
/// which is rebuilt from a fresh observation every pass.
pub trait PlannerStage {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Quick check before running. Return false to skip this stage.
    fn is_applicable(&self, _ctx: &PlanContext) -> bool {
        true
    }

    /// Issue at most `remaining` requests and return how many were issued.
    fn run(&self, ctx: &mut PlanContext, remaining: u32) -> u32;
}
