//! Hand-designed base template: for each structure type, the ordered list of
//! offsets from the anchor where that type should go.
//!
//! The cardinal cross through the anchor (`dx == 0 || dy == 0`) is never
//! claimed by a stamp; it stays free for roads and perimeter gates.

pub mod extension;
pub mod hub;
pub mod lab;
pub mod tower;

use crate::location::Location;
use crate::structure::StructureType;
use fnv::{FnvHashMap, FnvHashSet};

/// Offsets for a single structure type, in placement order.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub structure_type: StructureType,
    pub offsets: Vec<(i8, i8)>,
}

impl Stamp {
    pub fn new(structure_type: StructureType, offsets: &[(i8, i8)]) -> Stamp {
        Stamp {
            structure_type,
            offsets: offsets.to_vec(),
        }
    }

    /// Absolute positions for this stamp around `anchor`, in stamp order.
    /// Offsets that fall off the grid are dropped.
    pub fn place_at(&self, anchor: Location) -> impl Iterator<Item = Location> + '_ {
        self.offsets
            .iter()
            .filter_map(move |&(dx, dy)| anchor.offset(dx as i16, dy as i16))
    }
}

/// Type-indexed collection of stamps, plus the offsets the template keeps
/// open on purpose (spokes, the lab center).
#[derive(Clone, Debug)]
pub struct StampSet {
    stamps: FnvHashMap<StructureType, Stamp>,
    open: FnvHashSet<(i8, i8)>,
}

impl Default for StampSet {
    fn default() -> Self {
        default_stamps()
    }
}

impl StampSet {
    pub fn new(stamps: Vec<Stamp>) -> StampSet {
        StampSet {
            stamps: stamps
                .into_iter()
                .map(|stamp| (stamp.structure_type, stamp))
                .collect(),
            open: FnvHashSet::default(),
        }
    }

    /// Mark offsets that no structure may take, stamped or not.
    pub fn with_open(mut self, offsets: impl IntoIterator<Item = (i8, i8)>) -> StampSet {
        self.open.extend(offsets);
        self
    }

    pub fn open_offsets(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.open.iter().copied()
    }

    /// Every offset the template either claims or keeps open.
    pub fn reserved_offsets(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.iter()
            .flat_map(|stamp| stamp.offsets.iter().copied())
            .chain(self.open_offsets())
    }

    pub fn get(&self, structure_type: StructureType) -> Option<&Stamp> {
        self.stamps.get(&structure_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stamp> {
        self.stamps.values()
    }

    /// Check the template is self-consistent:
    /// - No offset is claimed by two stamps (or twice by one).
    /// - No offset lies on the cardinal cross through the anchor.
    /// - No stamp claims an offset kept open.
    pub fn validate(&self) -> bool {
        let mut seen = FnvHashSet::default();
        self.iter()
            .flat_map(|stamp| stamp.offsets.iter())
            .all(|&(dx, dy)| {
                dx != 0 && dy != 0 && !self.open.contains(&(dx, dy)) && seen.insert((dx, dy))
            })
    }
}

/// The full base template.
pub fn default_stamps() -> StampSet {
    let mut stamps = hub::hub_stamps();
    stamps.push(tower::tower_stamp());
    stamps.push(lab::lab_stamp());

    let reserved: FnvHashSet<(i8, i8)> = stamps
        .iter()
        .flat_map(|s| s.offsets.iter().copied())
        .chain(std::iter::once(lab::LAB_CENTER))
        .collect();
    stamps.push(extension::extension_stamp(&reserved));

    // Hub and lab corners sit on the diagonals; only the free spoke tiles stay open.
    let open: Vec<(i8, i8)> = extension::spoke_offsets()
        .into_iter()
        .filter(|offset| !reserved.contains(offset))
        .chain(std::iter::once(lab::LAB_CENTER))
        .collect();
    StampSet::new(stamps).with_open(open)
}
