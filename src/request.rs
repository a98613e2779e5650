use crate::location::*;
use crate::structure::*;
use serde::{Deserialize, Serialize};

/// A single construction request emitted by the planner.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ConstructionRequest {
    pub location: Location,
    pub structure_type: StructureType,
}

/// What the sink did with a request.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RequestOutcome {
    Accepted,
    Rejected,
}

/// Consumer of construction requests (the host's build queue).
///
/// Rejections are expected (quota races, terrain that changed since the
/// observation was taken) and are never retried within the same pass.
pub trait ConstructionSink {
    fn request_construction(
        &mut self,
        location: Location,
        structure_type: StructureType,
    ) -> RequestOutcome;
}

/// Sink that records every request and accepts all of them unless a
/// rejection filter says otherwise. Used for offline planning and tests.
#[derive(Default)]
pub struct RecordingSink {
    pub accepted: Vec<ConstructionRequest>,
    pub rejected: Vec<ConstructionRequest>,
    reject_if: Option<Box<dyn Fn(&ConstructionRequest) -> bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting<F>(reject_if: F) -> Self
    where
        F: Fn(&ConstructionRequest) -> bool + 'static,
    {
        RecordingSink {
            reject_if: Some(Box::new(reject_if)),
            ..Default::default()
        }
    }

    pub fn of_type(&self, structure_type: StructureType) -> Vec<Location> {
        self.accepted
            .iter()
            .filter(|r| r.structure_type == structure_type)
            .map(|r| r.location)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

impl ConstructionSink for RecordingSink {
    fn request_construction(
        &mut self,
        location: Location,
        structure_type: StructureType,
    ) -> RequestOutcome {
        let request = ConstructionRequest {
            location,
            structure_type,
        };
        let rejected = self
            .reject_if
            .as_ref()
            .map(|reject| reject(&request))
            .unwrap_or(false);
        if rejected {
            self.rejected.push(request);
            RequestOutcome::Rejected
        } else {
            self.accepted.push(request);
            RequestOutcome::Accepted
        }
    }
}
