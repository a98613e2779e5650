//! Budget scheduler for one planning pass.
//!
//! A pass walks `Idle -> Stamp -> Ring -> Road -> Defense -> Idle`. Each phase
//! gets whatever budget the previous phases left and the pass ends early once
//! it reaches zero. Nothing is carried between passes: the next pass starts
//! over at `Stamp` with a fresh observation.

use crate::path::*;
use crate::stage::*;
use crate::stages::*;
use crate::stamps::StampSet;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum PlannerPhase {
    Idle,
    Stamp,
    Ring,
    Road,
    Defense,
}

impl PlannerPhase {
    pub fn next(self) -> PlannerPhase {
        match self {
            PlannerPhase::Idle => PlannerPhase::Stamp,
            PlannerPhase::Stamp => PlannerPhase::Ring,
            PlannerPhase::Ring => PlannerPhase::Road,
            PlannerPhase::Road => PlannerPhase::Defense,
            PlannerPhase::Defense => PlannerPhase::Idle,
        }
    }
}

/// Requests issued by one phase, accepted or not.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct PhaseOutcome {
    pub phase: PlannerPhase,
    pub issued: u32,
}

/// The stage run in each active phase.
pub struct StageSet<P: PathFinder = AstarPathFinder> {
    pub stamp: StampStage,
    pub ring: RingStage,
    pub roads: RoadNetworkStage<P>,
    pub defense: DefenseStage,
}

impl Default for StageSet {
    fn default() -> Self {
        StageSet::new(StampSet::default(), AstarPathFinder)
    }
}

impl<P: PathFinder> StageSet<P> {
    pub fn new(stamps: StampSet, path_finder: P) -> Self {
        StageSet {
            ring: RingStage::new(&stamps),
            stamp: StampStage::new(stamps),
            roads: RoadNetworkStage::new(path_finder),
            defense: DefenseStage,
        }
    }

    pub fn stage(&self, phase: PlannerPhase) -> Option<&dyn PlannerStage> {
        match phase {
            PlannerPhase::Idle => None,
            PlannerPhase::Stamp => Some(&self.stamp),
            PlannerPhase::Ring => Some(&self.ring),
            PlannerPhase::Road => Some(&self.roads),
            PlannerPhase::Defense => Some(&self.defense),
        }
    }

    /// Run every phase in order against `budget`.
    pub fn run(&self, ctx: &mut PlanContext, budget: u32) -> Vec<PhaseOutcome> {
        let mut outcomes = Vec::new();
        let mut remaining = budget;
        let mut phase = PlannerPhase::Idle.next();

        while phase != PlannerPhase::Idle && remaining > 0 {
            if let Some(stage) = self.stage(phase) {
                if stage.is_applicable(ctx) {
                    let issued = stage.run(ctx, remaining).min(remaining);
                    remaining -= issued;
                    debug!(
                        "{}: {} issued {}, {} left",
                        ctx.colony.name,
                        stage.name(),
                        issued,
                        remaining
                    );
                    outcomes.push(PhaseOutcome { phase, issued });
                } else {
                    trace!("{}: {} not applicable", ctx.colony.name, stage.name());
                }
            }
            phase = phase.next();
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::ColonyState;
    use crate::config::PlannerConfig;
    use crate::location::Location;
    use crate::observation::ColonySnapshot;
    use crate::request::RecordingSink;
    use crate::stage::tests::context;

    #[test]
    fn phases_cycle_back_to_idle() {
        let mut phase = PlannerPhase::Idle;
        let mut seen = Vec::new();
        loop {
            phase = phase.next();
            if phase == PlannerPhase::Idle {
                break;
            }
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                PlannerPhase::Stamp,
                PlannerPhase::Ring,
                PlannerPhase::Road,
                PlannerPhase::Defense
            ]
        );
    }

    #[test]
    fn exhausted_budget_skips_later_phases() {
        let mut grid = ColonySnapshot::default();
        grid.set_controller(Location::from_xy(25, 32));
        let config = PlannerConfig::default();
        let mut colony = ColonyState::new("W1N1", 4);
        let mut sink = RecordingSink::new();
        let outcomes = {
            let mut ctx = context(&grid, &mut colony, &config, &mut sink);
            StageSet::<AstarPathFinder>::default().run(&mut ctx, 5)
        };
        assert_eq!(
            outcomes,
            vec![PhaseOutcome {
                phase: PlannerPhase::Stamp,
                issued: 5
            }]
        );
        assert_eq!(sink.total(), 5);
    }

    #[test]
    fn inapplicable_phases_are_not_reported() {
        let grid = ColonySnapshot::default();
        let config = PlannerConfig::default();
        let mut colony = ColonyState::new("W1N1", 1);
        let mut sink = RecordingSink::new();
        let outcomes = {
            let mut ctx = context(&grid, &mut colony, &config, &mut sink);
            StageSet::<AstarPathFinder>::default().run(&mut ctx, 10)
        };
        let phases: Vec<PlannerPhase> = outcomes.iter().map(|o| o.phase).collect();
        assert_eq!(phases, vec![PlannerPhase::Stamp, PlannerPhase::Ring]);
        assert_eq!(outcomes[0].issued, 1);
        assert_eq!(outcomes[1].issued, 0);
    }
}
