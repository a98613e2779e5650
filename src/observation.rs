use crate::location::*;
use crate::request::ConstructionRequest;
use crate::structure::*;
use crate::terrain::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Anything sitting on a tile that the planner has to respect.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Occupant {
    Structure(StructureType),
    PendingRequest(StructureType),
    ResourceNode,
    Controller,
}

impl Occupant {
    /// The structure type carried by a built structure or pending request.
    pub fn structure_type(&self) -> Option<StructureType> {
        match self {
            Occupant::Structure(st) | Occupant::PendingRequest(st) => Some(*st),
            Occupant::ResourceNode | Occupant::Controller => None,
        }
    }
}

/// Read-only view of a colony's grid for one tick.
/// Implementations exist for the live host and for offline use (`ColonySnapshot`).
pub trait GridObservation {
    fn terrain(&self) -> &GridTerrain;

    fn occupants_at(&self, loc: Location) -> &[Occupant];

    /// Every tile with at least one occupant.
    fn occupied_tiles(&self) -> Box<dyn Iterator<Item = (Location, &[Occupant])> + '_>;

    fn resource_nodes(&self) -> &[Location];

    fn controller(&self) -> Option<Location>;

    /// Current capability tier of the colony.
    fn tier(&self) -> u8;

    fn terrain_at(&self, loc: Location) -> TerrainClass {
        self.terrain().class_at(loc)
    }

    /// Position of the first built spawn point, if any.
    fn primary_spawn(&self) -> Option<Location> {
        self.occupied_tiles()
            .filter(|(_, occupants)| {
                occupants.contains(&Occupant::Structure(StructureType::SpawnPoint))
            })
            .map(|(loc, _)| loc)
            .min()
    }

    /// Construction requests the host has queued but not finished.
    fn outstanding_requests(&self) -> u32 {
        self.occupied_tiles()
            .flat_map(|(_, occupants)| occupants.iter())
            .filter(|o| matches!(o, Occupant::PendingRequest(_)))
            .count() as u32
    }
}

/// Owned observation of a colony, built by the host or by tests.
#[derive(Clone, Default)]
pub struct ColonySnapshot {
    terrain: GridTerrain,
    occupants: FnvHashMap<Location, Vec<Occupant>>,
    resource_nodes: Vec<Location>,
    controller: Option<Location>,
    tier: u8,
}

impl ColonySnapshot {
    pub fn new(terrain: GridTerrain) -> Self {
        ColonySnapshot {
            terrain,
            ..Default::default()
        }
    }

    pub fn set_tier(&mut self, tier: u8) {
        self.tier = tier;
    }

    pub fn terrain_mut(&mut self) -> &mut GridTerrain {
        &mut self.terrain
    }

    pub fn add_occupant(&mut self, loc: Location, occupant: Occupant) {
        self.occupants.entry(loc).or_default().push(occupant);
    }

    pub fn add_resource_node(&mut self, loc: Location) {
        self.resource_nodes.push(loc);
        self.add_occupant(loc, Occupant::ResourceNode);
    }

    pub fn set_controller(&mut self, loc: Location) {
        if let Some(previous) = self.controller.replace(loc) {
            if let Some(items) = self.occupants.get_mut(&previous) {
                items.retain(|o| *o != Occupant::Controller);
            }
        }
        self.add_occupant(loc, Occupant::Controller);
    }

    pub fn add_structure(&mut self, loc: Location, structure_type: StructureType) {
        self.add_occupant(loc, Occupant::Structure(structure_type));
    }

    pub fn add_pending(&mut self, loc: Location, structure_type: StructureType) {
        self.add_occupant(loc, Occupant::PendingRequest(structure_type));
    }

    /// Queue accepted requests so the next observation sees them as pending.
    pub fn add_requests(&mut self, requests: &[ConstructionRequest]) {
        for request in requests {
            self.add_pending(request.location, request.structure_type);
        }
    }

    /// Turn every pending request into a built structure.
    pub fn complete_pending(&mut self) {
        for items in self.occupants.values_mut() {
            for occupant in items.iter_mut() {
                if let Occupant::PendingRequest(st) = *occupant {
                    *occupant = Occupant::Structure(st);
                }
            }
        }
    }

    pub fn count(&self, occupant: Occupant) -> usize {
        self.occupants
            .values()
            .flat_map(|items| items.iter())
            .filter(|o| **o == occupant)
            .count()
    }
}

impl GridObservation for ColonySnapshot {
    fn terrain(&self) -> &GridTerrain {
        &self.terrain
    }

    fn occupants_at(&self, loc: Location) -> &[Occupant] {
        self.occupants
            .get(&loc)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn occupied_tiles(&self) -> Box<dyn Iterator<Item = (Location, &[Occupant])> + '_> {
        Box::new(
            self.occupants
                .iter()
                .filter(|(_, items)| !items.is_empty())
                .map(|(loc, items)| (*loc, items.as_slice())),
        )
    }

    fn resource_nodes(&self) -> &[Location] {
        &self.resource_nodes
    }

    fn controller(&self) -> Option<Location> {
        self.controller
    }

    fn tier(&self) -> u8 {
        self.tier
    }
}
