use super::*;

/// Six towers around the hub at distance 3, two on each of the north, east
/// and west faces. The south face is left open toward the lab cluster.
pub fn tower_stamp() -> Stamp {
    Stamp::new(
        StructureType::DefenseTower,
        &[(-1, -3), (1, -3), (3, -1), (3, 1), (-3, -1), (-3, 1)],
    )
}
