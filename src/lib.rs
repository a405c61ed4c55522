/// Learning agent and its value and policy tables
pub mod algo;

/// Grid world environment
pub mod env;

/// Exploration policies
pub mod exploration;

/// Text rendering of learned values and policies
pub mod render;

/// Training driver with episode bookkeeping and map editing
pub mod session;

mod error;
mod util;

pub use error::{Error, Result};
