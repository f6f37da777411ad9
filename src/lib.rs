pub mod animation;
pub mod bfs;
pub mod config;
pub mod error;
pub mod explorer;
pub mod network;

pub use animation::{AnimationPhase, AnimationScheduler};
pub use bfs::{PathSearch, find_shortest_path};
pub use config::{AnimationConfig, AppConfig, NetworkConfig};
pub use error::ExplorerError;
pub use explorer::Explorer;
pub use network::{SocialNetwork, Tier, User, UserId};
