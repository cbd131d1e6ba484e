pub mod logging;
pub mod unicode;
