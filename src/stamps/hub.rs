use super::*;

/// Hub structures packed within Chebyshev distance 2 of the anchor.
///
/// ```text
///      x: -2 -1  0  1  2
/// y:-2     O  L  |  .  .
/// y:-1     F  S  |  S  L
/// y: 0     -  -  A  -  -
/// y: 1     .  S  |  E  T
/// y: 2     .  .  |  P  W
/// ```
///
/// A = anchor, S = spawn point, E = energy store, T = trade post,
/// P = production post, F = power feed, L = relay link, O = long-range sensor,
/// W = area weapon. `|`/`-` is the road cross, `.` is left to extensions.
pub fn hub_stamps() -> Vec<Stamp> {
    vec![
        Stamp::new(StructureType::SpawnPoint, &[(-1, -1), (1, -1), (-1, 1)]),
        Stamp::new(StructureType::EnergyStore, &[(1, 1)]),
        Stamp::new(StructureType::TradePost, &[(2, 1)]),
        Stamp::new(StructureType::ProductionPost, &[(1, 2)]),
        Stamp::new(StructureType::PowerFeed, &[(-2, -1)]),
        Stamp::new(StructureType::RelayLink, &[(2, -1), (-1, -2)]),
        Stamp::new(StructureType::LongRangeSensor, &[(-2, -2)]),
        Stamp::new(StructureType::AreaWeapon, &[(2, 2)]),
    ]
}
