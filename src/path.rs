//! Shortest-path service used by the road network stage.

use crate::location::*;
use crate::terrain::*;
use pathfinding::directed::astar::astar;

/// Per-tile step cost. `None` means the tile cannot be entered.
pub trait TileCosts {
    fn cost(&self, loc: Location) -> Option<u32>;

    /// Lower bound on any step cost, used to keep the A* heuristic admissible.
    fn min_cost(&self) -> u32;
}

pub trait PathFinder {
    /// Ordered tiles from `from` to `to` (both inclusive), or `None` when
    /// no route exists.
    fn shortest_path(
        &self,
        from: Location,
        to: Location,
        costs: &dyn TileCosts,
    ) -> Option<Vec<Location>>;
}

/// A* over 8-connected tiles.
#[derive(Copy, Clone, Debug, Default)]
pub struct AstarPathFinder;

impl PathFinder for AstarPathFinder {
    fn shortest_path(
        &self,
        from: Location,
        to: Location,
        costs: &dyn TileCosts,
    ) -> Option<Vec<Location>> {
        let min_cost = costs.min_cost();

        astar(
            &from,
            |&loc| {
                NEIGHBORS_8
                    .iter()
                    .filter_map(move |&(dx, dy)| {
                        let next = loc.offset(dx as i16, dy as i16)?;
                        costs.cost(next).map(|cost| (next, cost))
                    })
                    .collect::<Vec<_>>()
            },
            |&loc| loc.distance_to(to) as u32 * min_cost,
            |&loc| loc == to,
        )
        .map(|(path, _cost)| path)
    }
}
