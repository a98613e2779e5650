use crate::constants::*;
use serde::*;

/// A tile coordinate on the colony grid, packed into a `u16`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x << 8) | y) as u16,
        }
    }

    #[inline]
    pub fn from_xy(x: u8, y: u8) -> Self {
        Location::from_coords(x as u32, y as u32)
    }

    /// Build a location from signed coordinates, returning `None` outside the grid.
    pub fn checked(x: i16, y: i16) -> Option<Self> {
        if (0..ROOM_WIDTH as i16).contains(&x) && (0..ROOM_HEIGHT as i16).contains(&y) {
            Some(Location::from_coords(x as u32, y as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// The tile at `(dx, dy)` from this one, if it is on the grid.
    pub fn offset(self, dx: i16, dy: i16) -> Option<Self> {
        Location::checked(self.x() as i16 + dx, self.y() as i16 + dy)
    }

    /// Signed `(dx, dy)` from `origin` to this tile.
    pub fn delta_from(self, origin: Self) -> (i16, i16) {
        (
            self.x() as i16 - origin.x() as i16,
            self.y() as i16 - origin.y() as i16,
        )
    }

    pub fn distance_to(self, other: Self) -> u8 {
        let dx = (self.x() as i16) - (other.x() as i16);
        let dy = (self.y() as i16) - (other.y() as i16);

        dx.abs().max(dy.abs()) as u8
    }

    /// Distance from the nearest grid edge.
    pub fn edge_distance(self) -> u8 {
        self.x()
            .min(self.y())
            .min(ROOM_WIDTH - 1 - self.x())
            .min(ROOM_HEIGHT - 1 - self.y())
    }

    /// Inside the area where non-route structures may be built.
    pub fn is_buildable_interior(self) -> bool {
        self.edge_distance() >= ROOM_BUILD_BORDER
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let packed = u16::deserialize(deserializer)?;
        let loc = Location::from_packed(packed);
        Location::checked(loc.x() as i16, loc.y() as i16).ok_or_else(|| {
            de::Error::custom(format!(
                "packed location {} is off the grid ({}, {})",
                packed,
                loc.x(),
                loc.y()
            ))
        })
    }
}

/// Offsets of every tile at exactly Chebyshev distance `radius` from the
/// origin, walked clockwise from the top-left corner.
pub fn chebyshev_ring(radius: u8) -> Vec<(i16, i16)> {
    let r = radius as i16;
    if r == 0 {
        return vec![(0, 0)];
    }

    let mut offsets = Vec::with_capacity(8 * r as usize);
    for dx in -r..r {
        offsets.push((dx, -r));
    }
    for dy in -r..r {
        offsets.push((r, dy));
    }
    for dx in (-r + 1..=r).rev() {
        offsets.push((dx, r));
    }
    for dy in (-r + 1..=r).rev() {
        offsets.push((-r, dy));
    }
    offsets
}
