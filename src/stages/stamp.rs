//! StampStage: places structures at the fixed template offsets around the
//! anchor, walking types in priority order so scarce budget goes to core
//! infrastructure first.

use crate::constants::PRIORITY_ORDER;
use crate::stage::*;
use crate::stamps::StampSet;
use log::*;

pub struct StampStage {
    stamps: StampSet,
}

impl StampStage {
    pub fn new(stamps: StampSet) -> Self {
        StampStage { stamps }
    }
}

impl Default for StampStage {
    fn default() -> Self {
        StampStage::new(StampSet::default())
    }
}

impl PlannerStage for StampStage {
    fn name(&self) -> &str {
        "stamp"
    }

    fn run(&self, ctx: &mut PlanContext, budget: u32) -> u32 {
        let mut remaining = budget;

        for structure_type in PRIORITY_ORDER {
            if remaining == 0 {
                break;
            }
            if ctx.need(structure_type) == 0 {
                continue;
            }
            let stamp = match self.stamps.get(structure_type) {
                Some(stamp) => stamp,
                None => continue,
            };

            for loc in stamp.place_at(ctx.anchor) {
                if remaining == 0 || ctx.need(structure_type) == 0 {
                    break;
                }
                if ctx.place(loc, structure_type, &mut remaining).is_none() {
                    trace!("stamp: skipped {} at ({}, {})", structure_type, loc.x(), loc.y());
                }
            }
        }

        budget - remaining
    }
}
