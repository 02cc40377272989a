pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;
pub mod sweep;

pub use config::SolveOptions;
pub use error::{PortionError, Result};
pub use models::{MacroTarget, Macros, PortionableItem, SolveResult};
pub use planner::solve;
