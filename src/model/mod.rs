pub mod config;
pub mod group;
pub mod link;

pub use config::*;
pub use group::*;
pub use link::*;
