use super::*;
use crate::location::chebyshev_ring;

/// Innermost and outermost rings used by growth extensions.
pub const EXTENSION_MIN_RADIUS: u8 = 2;
pub const EXTENSION_MAX_RADIUS: u8 = 5;

/// Growth extensions fill the diagonal bands between the road spokes.
///
/// Every tile from ring 2 through ring 5 is used except the cardinal cross,
/// the two main diagonals (walkable spokes out of the hub) and tiles already
/// `reserved` by other stamps. Offsets are ordered innermost ring first.
pub fn extension_stamp(reserved: &FnvHashSet<(i8, i8)>) -> Stamp {
    let offsets: Vec<(i8, i8)> = (EXTENSION_MIN_RADIUS..=EXTENSION_MAX_RADIUS)
        .flat_map(chebyshev_ring)
        .map(|(dx, dy)| (dx as i8, dy as i8))
        .filter(|&(dx, dy)| dx != 0 && dy != 0 && dx.abs() != dy.abs())
        .filter(|offset| !reserved.contains(offset))
        .collect();

    Stamp {
        structure_type: StructureType::GrowthExtension,
        offsets,
    }
}

/// Diagonal tiles through the extension bands that stay walkable.
pub fn spoke_offsets() -> Vec<(i8, i8)> {
    (EXTENSION_MIN_RADIUS as i8..=EXTENSION_MAX_RADIUS as i8)
        .flat_map(|r| [(r, r), (r, -r), (-r, r), (-r, -r)])
        .collect()
}
