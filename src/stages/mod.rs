pub mod anchor;
pub mod defense;
pub mod ring;
pub mod road_network;
pub mod stamp;

pub use anchor::{select_anchor, AnchorChoice, AnchorSource};
pub use defense::DefenseStage;
pub use ring::RingStage;
pub use road_network::RoadNetworkStage;
pub use stamp::StampStage;
