//! Anchor selection: picks the tile a colony's base is built around.
//!
//! Candidates come from a square around the centroid of the resource nodes
//! and the controller. Each surviving candidate is scored with four additive
//! terms (controller stand-off deviation, summed resource distance, edge
//! penalty, local wall count) and the lowest score wins.

use crate::config::AnchorWeights;
use crate::location::*;
use crate::observation::*;
use crate::terrain::TerrainClass;
use itertools::iproduct;
use log::*;

/// Where the chosen anchor came from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AnchorSource {
    Scored,
    PrimarySpawn,
    Controller,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AnchorChoice {
    pub location: Location,
    pub source: AnchorSource,
    /// Score of the winning candidate; `None` for fallbacks.
    pub score: Option<f32>,
}

/// Choose an anchor for a colony that does not have one yet. Pure query; the
/// caller persists the result.
pub fn select_anchor(grid: &dyn GridObservation, weights: &AnchorWeights) -> Option<AnchorChoice> {
    if let Some((location, score)) = best_scored_candidate(grid, weights) {
        return Some(AnchorChoice {
            location,
            source: AnchorSource::Scored,
            score: Some(score),
        });
    }

    grid.primary_spawn()
        .map(|location| (location, AnchorSource::PrimarySpawn))
        .or_else(|| grid.controller().map(|location| (location, AnchorSource::Controller)))
        .map(|(location, source)| AnchorChoice {
            location,
            source,
            score: None,
        })
}

/// Rounded centroid of every resource node and the controller.
pub fn landmark_centroid(grid: &dyn GridObservation) -> Option<Location> {
    let landmarks: Vec<Location> = grid
        .resource_nodes()
        .iter()
        .copied()
        .chain(grid.controller())
        .collect();
    if landmarks.is_empty() {
        return None;
    }

    let count = landmarks.len() as f32;
    let cx = landmarks.iter().map(|l| l.x() as f32).sum::<f32>() / count;
    let cy = landmarks.iter().map(|l| l.y() as f32).sum::<f32>() / count;
    Location::checked(cx.round() as i16, cy.round() as i16)
}

fn best_scored_candidate(
    grid: &dyn GridObservation,
    weights: &AnchorWeights,
) -> Option<(Location, f32)> {
    let center = landmark_centroid(grid)?;
    let r = weights.search_radius as i16;

    iproduct!(-r..=r, -r..=r)
        .filter_map(|(dy, dx)| center.offset(dx, dy))
        .filter(|&loc| is_candidate(grid, loc))
        .filter_map(|loc| score_candidate(grid, weights, loc).map(|score| (loc, score)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
}

fn is_candidate(grid: &dyn GridObservation, loc: Location) -> bool {
    loc.is_buildable_interior()
        && grid.terrain_at(loc) != TerrainClass::Impassable
        && grid.occupants_at(loc).is_empty()
}

/// Score a candidate tile. Lower is better; `None` rejects the tile for
/// having too many impassable tiles nearby.
pub fn score_candidate(
    grid: &dyn GridObservation,
    weights: &AnchorWeights,
    loc: Location,
) -> Option<f32> {
    let walls = grid.terrain().walls_within(loc, weights.openness_radius);
    if walls > weights.max_impassable {
        trace!("anchor candidate ({}, {}) too closed in: {} walls", loc.x(), loc.y(), walls);
        return None;
    }

    let controller_term = grid
        .controller()
        .map(|c| {
            let deviation = loc.distance_to(c) as f32 - weights.ideal_controller_distance;
            deviation.abs() * weights.controller_weight
        })
        .unwrap_or(0.0);

    let resource_term = grid
        .resource_nodes()
        .iter()
        .map(|node| loc.distance_to(*node) as f32)
        .sum::<f32>()
        * weights.resource_weight;

    let edge_term = if loc.edge_distance() < weights.edge_margin {
        weights.edge_penalty
    } else {
        0.0
    };

    let openness_term = walls as f32 * weights.openness_weight;

    Some(controller_term + resource_term + edge_term + openness_term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureType;
    use crate::terrain::TerrainFlags;

    fn open_colony() -> ColonySnapshot {
        let mut grid = ColonySnapshot::default();
        grid.set_controller(Location::from_xy(25, 25));
        grid.add_resource_node(Location::from_xy(20, 20));
        grid
    }

    #[test]
    fn anchor_lands_near_the_centroid() {
        let grid = open_colony();
        assert_eq!(landmark_centroid(&grid), Some(Location::from_xy(23, 23)));

        let choice = select_anchor(&grid, &AnchorWeights::default()).unwrap();
        assert_eq!(choice.source, AnchorSource::Scored);
        assert!(choice.location.distance_to(Location::from_xy(23, 23)) <= 5);
        assert_eq!(
            choice.location.distance_to(Location::from_xy(25, 25)),
            3,
            "ideal stand-off from the controller"
        );
        assert!(grid.occupants_at(choice.location).is_empty());
    }

    #[test]
    fn selection_is_deterministic() {
        let grid = open_colony();
        let weights = AnchorWeights::default();
        let first = select_anchor(&grid, &weights);
        for _ in 0..5 {
            assert_eq!(select_anchor(&grid, &weights), first);
        }
    }

    #[test]
    fn walled_in_candidates_are_rejected() {
        let mut grid = open_colony();
        let weights = AnchorWeights::default();
        let loc = Location::from_xy(30, 30);
        for (x, y) in [(29, 29), (30, 29), (31, 29), (29, 30), (31, 30)] {
            grid.terrain_mut().set_xy(x, y, TerrainFlags::WALL);
        }
        assert_eq!(score_candidate(&grid, &weights, loc), None);

        let open = score_candidate(&grid, &weights, Location::from_xy(35, 35)).unwrap();
        let near_edge = score_candidate(&grid, &weights, Location::from_xy(3, 35)).unwrap();
        assert!(near_edge - open > weights.edge_penalty - 50.0);
    }

    #[test]
    fn falls_back_to_spawn_then_controller() {
        let mut grid = ColonySnapshot::default();
        // Controller boxed in by walls: every scanned tile is too closed in.
        for y in 0..50u8 {
            for x in 0..50u8 {
                grid.terrain_mut().set_xy(x, y, TerrainFlags::WALL);
            }
        }
        grid.terrain_mut().set_xy(10, 10, TerrainFlags::NONE);
        grid.set_controller(Location::from_xy(10, 10));

        let weights = AnchorWeights::default();
        let choice = select_anchor(&grid, &weights).unwrap();
        assert_eq!(choice.source, AnchorSource::Controller);
        assert_eq!(choice.location, Location::from_xy(10, 10));

        grid.add_structure(Location::from_xy(10, 12), StructureType::SpawnPoint);
        let choice = select_anchor(&grid, &weights).unwrap();
        assert_eq!(choice.source, AnchorSource::PrimarySpawn);
        assert_eq!(choice.location, Location::from_xy(10, 12));
    }

    #[test]
    fn nothing_to_anchor_on() {
        let grid = ColonySnapshot::default();
        assert_eq!(select_anchor(&grid, &AnchorWeights::default()), None);
    }
}
