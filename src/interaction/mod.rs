pub mod controller;
pub mod hover;

pub use controller::{InteractionController, LinkDraft, TitleEdit};
pub use hover::HoverTimers;
