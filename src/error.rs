use crate::structure::StructureType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// No scored candidate, spawn point or controller could serve as anchor.
    #[error("colony {colony} has no viable anchor this tick")]
    NoViableAnchor { colony: String },
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse planner configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("quota for {structure_type} decreases at tier {tier}")]
    NonMonotonicQuota {
        structure_type: StructureType,
        tier: u8,
    },
    #[error("placement range for {structure_type} has min > max")]
    InvalidRange { structure_type: StructureType },
    #[error("per-invocation budget must be greater than zero")]
    ZeroBudget,
    #[error("stamp template claims an offset twice or sits on the cardinal cross")]
    OverlappingStamps,
}
