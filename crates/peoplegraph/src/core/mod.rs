//! Core abstractions for graph layout
//!
//! This module defines the data model, error taxonomy, and the traits that
//! storage and layout implementations plug into.

mod database;
mod error;
mod layout;
pub mod logging;
pub mod style;
mod types;

pub use database::*;
pub use error::*;
pub use layout::*;
pub use logging::*;
pub use types::*;
