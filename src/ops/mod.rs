pub mod change;
pub mod check;
pub mod group_ops;
pub mod link_ops;
pub mod organizer;
pub mod quick_add;
pub mod search;

pub use change::{Change, Direction, LinkPos, OpError};
pub use organizer::LinkOrganizer;
