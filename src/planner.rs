//! Public entry point: one planning pass per colony per tick.
//!
//! `ColonyPlanner` owns the validated configuration and the stage set. Each
//! call re-derives everything from the observation it is handed, so a pass
//! cut short by the budget or by rejected requests is simply picked up again
//! on the next tick.

use crate::colony::*;
use crate::config::PlannerConfig;
use crate::error::*;
use crate::location::*;
use crate::observation::GridObservation;
use crate::path::*;
use crate::pipeline::*;
use crate::request::ConstructionSink;
use crate::stage::PlanContext;
use crate::stages::*;
use crate::stamps::StampSet;
use log::*;
use serde::{Deserialize, Serialize};

/// Why a pass issued nothing.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum SkipReason {
    /// Outstanding requests are at `max_outstanding`.
    QueueFull,
}

/// Summary of one planning pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanReport {
    pub anchor: Location,
    /// Set only on the pass that chose the anchor.
    pub anchor_source: Option<AnchorSource>,
    pub phases: Vec<PhaseOutcome>,
    /// Requests sent to the sink, including rejected ones.
    pub issued: u32,
    /// Requests the sink accepted.
    pub accepted: u32,
    pub skipped: Option<SkipReason>,
}

pub struct ColonyPlanner<P: PathFinder = AstarPathFinder> {
    config: PlannerConfig,
    stages: StageSet<P>,
}

impl ColonyPlanner {
    /// Planner with the default template and A* roads.
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        Ok(ColonyPlanner {
            config,
            stages: StageSet::default(),
        })
    }
}

impl<P: PathFinder> ColonyPlanner<P> {
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Replace the base template.
    pub fn with_stamps(self, stamps: StampSet) -> Result<Self, PlannerError> {
        if !stamps.validate() {
            return Err(ConfigError::OverlappingStamps.into());
        }
        let ColonyPlanner { config, stages } = self;
        let StageSet { roads, .. } = stages;
        Ok(ColonyPlanner {
            config,
            stages: StageSet {
                ring: RingStage::new(&stamps),
                stamp: StampStage::new(stamps),
                roads,
                defense: DefenseStage,
            },
        })
    }

    /// Replace the path finder used for roads.
    pub fn with_path_finder<Q: PathFinder>(self, path_finder: Q) -> ColonyPlanner<Q> {
        let StageSet {
            stamp,
            ring,
            defense,
            ..
        } = self.stages;
        ColonyPlanner {
            config: self.config,
            stages: StageSet {
                stamp,
                ring,
                roads: RoadNetworkStage::new(path_finder),
                defense,
            },
        }
    }

    /// Load (or create) the colony's state, plan one pass and save the state.
    pub fn run_planner(
        &self,
        colony: &str,
        grid: &dyn GridObservation,
        store: &mut dyn ColonyStateStore,
        sink: &mut dyn ConstructionSink,
        tick: u64,
    ) -> Result<PlanReport, PlannerError> {
        let mut state = store
            .load(colony)
            .unwrap_or_else(|| ColonyState::new(colony, grid.tier()));
        state.tier = grid.tier();

        let result = self.plan_colony(&mut state, grid, sink, tick);
        store.save(state);
        result
    }

    /// Plan one pass for a colony whose state the caller manages.
    pub fn plan_colony(
        &self,
        state: &mut ColonyState,
        grid: &dyn GridObservation,
        sink: &mut dyn ConstructionSink,
        tick: u64,
    ) -> Result<PlanReport, PlannerError> {
        let (anchor, anchor_source) = match state.anchor {
            Some(anchor) => (anchor, None),
            None => {
                let choice = match select_anchor(grid, &self.config.anchor) {
                    Some(choice) => choice,
                    None => {
                        info!("{}: no viable anchor, colony unplannable this tick", state.name);
                        return Err(PlannerError::NoViableAnchor {
                            colony: state.name.clone(),
                        });
                    }
                };
                info!(
                    "{}: anchor at ({}, {}) from {:?}",
                    state.name,
                    choice.location.x(),
                    choice.location.y(),
                    choice.source
                );
                state.anchor = Some(choice.location);
                (choice.location, Some(choice.source))
            }
        };

        let mut report = PlanReport {
            anchor,
            anchor_source,
            phases: Vec::new(),
            issued: 0,
            accepted: 0,
            skipped: None,
        };

        let outstanding = grid.outstanding_requests();
        if outstanding >= self.config.max_outstanding {
            debug!(
                "{}: {} requests outstanding, skipping pass",
                state.name, outstanding
            );
            report.skipped = Some(SkipReason::QueueFull);
            return Ok(report);
        }
        let budget = self
            .config
            .budget
            .min(self.config.max_outstanding - outstanding);

        let mut ctx = PlanContext::new(grid, state, &self.config, anchor, tick, sink);
        report.phases = self.stages.run(&mut ctx, budget);
        report.issued = report.phases.iter().map(|p| p.issued).sum();
        report.accepted = ctx.issued_count() as u32;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuotaTable;
    use crate::observation::ColonySnapshot;
    use crate::request::RecordingSink;
    use crate::stamps::Stamp;
    use crate::structure::StructureType;

    fn colony_grid() -> ColonySnapshot {
        let mut grid = ColonySnapshot::default();
        grid.set_controller(Location::from_xy(25, 25));
        grid.add_resource_node(Location::from_xy(20, 20));
        grid.set_tier(1);
        grid
    }

    #[test]
    fn anchor_is_chosen_once_and_kept() {
        let planner = ColonyPlanner::new(PlannerConfig::default()).unwrap();
        let grid = colony_grid();
        let mut state = ColonyState::new("W1N1", 1);
        let mut sink = RecordingSink::new();

        let first = planner.plan_colony(&mut state, &grid, &mut sink, 1).unwrap();
        assert_eq!(first.anchor_source, Some(AnchorSource::Scored));
        assert_eq!(state.anchor, Some(first.anchor));

        let second = planner.plan_colony(&mut state, &grid, &mut sink, 2).unwrap();
        assert_eq!(second.anchor_source, None);
        assert_eq!(second.anchor, first.anchor);
    }

    #[test]
    fn full_queue_skips_the_pass() {
        let planner = ColonyPlanner::new(PlannerConfig::default()).unwrap();
        let mut grid = colony_grid();
        for x in 10..20 {
            grid.add_pending(Location::from_xy(x, 40), StructureType::RouteTile);
        }
        let mut state = ColonyState::new("W1N1", 1);
        let mut sink = RecordingSink::new();

        let report = planner.plan_colony(&mut state, &grid, &mut sink, 1).unwrap();
        assert_eq!(report.skipped, Some(SkipReason::QueueFull));
        assert_eq!(sink.total(), 0);
        assert!(state.anchor.is_some(), "anchor selection still runs");
    }

    #[test]
    fn budget_is_clamped_to_queue_headroom() {
        let planner = ColonyPlanner::new(PlannerConfig::default()).unwrap();
        let mut grid = colony_grid();
        grid.set_tier(4);
        for x in 10..18 {
            grid.add_pending(Location::from_xy(x, 40), StructureType::RouteTile);
        }
        let mut state = ColonyState::new("W1N1", 4);
        let mut sink = RecordingSink::new();

        let report = planner.plan_colony(&mut state, &grid, &mut sink, 1).unwrap();
        assert_eq!(report.issued, 2);
        assert_eq!(sink.total(), 2);
    }

    #[test]
    fn unplannable_colony_reports_an_error() {
        let planner = ColonyPlanner::new(PlannerConfig::default()).unwrap();
        let grid = ColonySnapshot::default();
        let mut state = ColonyState::new("W9N9", 1);
        let mut sink = RecordingSink::new();
        let err = planner.plan_colony(&mut state, &grid, &mut sink, 1).unwrap_err();
        assert!(matches!(err, PlannerError::NoViableAnchor { ref colony } if colony == "W9N9"));
        assert_eq!(state.anchor, None);
    }

    #[test]
    fn invalid_configuration_is_refused() {
        let config = PlannerConfig {
            budget: 0,
            ..Default::default()
        };
        assert!(matches!(
            ColonyPlanner::new(config),
            Err(PlannerError::InvalidConfig(ConfigError::ZeroBudget))
        ));

        let planner = ColonyPlanner::new(PlannerConfig::default()).unwrap();
        let overlapping = StampSet::new(vec![
            Stamp::new(StructureType::SpawnPoint, &[(1, 1)]),
            Stamp::new(StructureType::EnergyStore, &[(1, 1)]),
        ]);
        assert!(planner.with_stamps(overlapping).is_err());
    }

    #[test]
    fn run_planner_persists_state() {
        let planner = ColonyPlanner::new(PlannerConfig::default()).unwrap();
        let grid = colony_grid();
        let mut store = MemoryColonyStore::new();
        let mut sink = RecordingSink::new();

        let report = planner
            .run_planner("W1N1", &grid, &mut store, &mut sink, 7)
            .unwrap();
        let saved = store.get("W1N1").unwrap();
        assert_eq!(saved.anchor, Some(report.anchor));
        assert_eq!(saved.tier, 1);
    }

    #[test]
    fn quota_changes_apply_without_a_tier_change() {
        let mut grid = colony_grid();
        grid.set_tier(3);
        let mut store = MemoryColonyStore::new();

        let cautious = ColonyPlanner::new(PlannerConfig {
            budget: 1,
            ..Default::default()
        })
        .unwrap();
        let mut sink = RecordingSink::new();
        cautious
            .run_planner("W1N1", &grid, &mut store, &mut sink, 1)
            .unwrap();
        assert!(sink.of_type(StructureType::DefenseTower).is_empty());
        assert!(store.get("W1N1").and_then(|s| s.quotas.as_ref()).is_some());

        let mut config = PlannerConfig {
            budget: 100,
            max_outstanding: 200,
            ..Default::default()
        };
        config.quotas = QuotaTable::default()
            .with_row(StructureType::DefenseTower, vec![0])
            .unwrap();
        let no_towers = ColonyPlanner::new(config).unwrap();
        let mut sink = RecordingSink::new();
        no_towers
            .run_planner("W1N1", &grid, &mut store, &mut sink, 2)
            .unwrap();
        assert!(sink.total() > 0);
        assert!(sink.of_type(StructureType::DefenseTower).is_empty());
    }
}
