//! Entity graph layout
//!
//! Loads an entity relationship document, splits it into clusters, lays each
//! cluster out top to bottom and composes the clusters onto one canvas.

mod compose;
mod config;
mod database;
mod digraph;
mod engine;
mod hierarchy;
mod loader;
mod ordering;
mod partition;
mod ranking;
mod view;

pub use compose::*;
pub use config::*;
pub use database::*;
pub use digraph::*;
pub use engine::*;
pub use hierarchy::*;
pub use loader::*;
pub use ordering::*;
pub use partition::*;
pub use ranking::*;
pub use view::*;
