pub mod colony;
pub mod config;
pub mod constants;
pub mod error;
pub mod location;
pub mod observation;
pub mod path;
pub mod pipeline;
pub mod planner;
pub mod request;
pub mod stage;
pub mod stages;
pub mod stamps;
pub mod structure;
pub mod terrain;

pub use colony::{ColonyState, ColonyStateStore, MemoryColonyStore, PerimeterStatus};
pub use config::PlannerConfig;
pub use error::{ConfigError, PlannerError};
pub use location::Location;
pub use observation::{ColonySnapshot, GridObservation, Occupant};
pub use planner::{ColonyPlanner, PlanReport, SkipReason};
pub use request::{ConstructionRequest, ConstructionSink, RecordingSink, RequestOutcome};
pub use structure::StructureType;
pub use terrain::{GridTerrain, TerrainClass, TerrainFlags};
