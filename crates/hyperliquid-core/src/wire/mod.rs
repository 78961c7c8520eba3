//! Wire model of venue actions.

pub mod actions;
pub mod order;

pub use actions::*;
pub use order::*;
